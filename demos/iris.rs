/// Iris classification demo.
///
/// Architecture: 4 → 16 (ReLU) → 16 (ReLU) → 3 (Softmax)
/// Loss:         categorical cross-entropy (fused softmax gradient)
/// Optimizer:    SGD, lr = 0.1, full-batch
///
/// Run with:
///   cargo run --example iris -- path/to/iris.data
///
/// The dataset is the classic UCI Iris CSV: 150 rows of four measurements
/// plus one of the three species labels.
use gradnet::{
    Activation, LayerSpec, LossType, NetworkSpec, Sgd, TrainConfig,
    load_iris, train_loop,
    train::trainer::accuracy,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn run(path: &str) -> gradnet::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let data = load_iris(path, true, 0.8, &mut rng)?;
    println!(
        "loaded {} training rows, {} validation rows",
        data.train_inputs.rows, data.val_inputs.rows
    );

    let spec = NetworkSpec {
        name: "iris".into(),
        layers: vec![
            LayerSpec { size: 16, input_size: 4, activation: Activation::ReLU },
            LayerSpec { size: 16, input_size: 16, activation: Activation::ReLU },
            LayerSpec { size: 3, input_size: 16, activation: Activation::Softmax },
        ],
        loss: LossType::CrossEntropy,
    };
    let mut network = spec.build(&mut rng)?;

    let optimizer = Sgd::new(0.1);
    let config = TrainConfig::new(1000, spec.loss);

    let final_loss = train_loop(
        &mut network,
        &data.train_inputs,
        &data.train_labels,
        Some((&data.val_inputs, &data.val_labels)),
        &optimizer,
        &config,
    )?;

    let val_acc = accuracy(&mut network, &data.val_inputs, &data.val_labels)?;
    println!("final training loss: {final_loss:.6}");
    println!("validation accuracy: {:.1}%", val_acc * 100.0);

    Ok(())
}

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "data/iris.data".to_owned());
    if let Err(err) = run(&path) {
        eprintln!("iris demo failed: {err}");
        std::process::exit(1);
    }
}
