pub mod dense;

pub use dense::{Dense, Delta, LayerGrads};
