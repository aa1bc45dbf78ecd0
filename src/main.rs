// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run the demos with:
//   cargo run --example xor
//   cargo run --example iris -- path/to/iris.data
fn main() {
    println!("gradnet: a minimal feed-forward neural network library.");
    println!("Run `cargo run --example xor` or `cargo run --example iris -- <iris.data>`.");
}
