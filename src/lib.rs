pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod data;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::Activation;
pub use layers::dense::{Dense, Delta, LayerGrads};
pub use network::network::Network;
pub use network::spec::{NetworkSpec, LayerSpec};
pub use loss::loss_type::LossType;
pub use optim::sgd::Sgd;
pub use train::trainer::{train_step, train_loop};
pub use train::train_config::TrainConfig;
pub use data::iris::{load_iris, DataSplit};
pub use error::{Error, Result};
