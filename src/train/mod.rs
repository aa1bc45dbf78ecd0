pub mod trainer;
pub mod train_config;
pub mod epoch_stats;

pub use trainer::{train_step, train_loop, evaluate_loss, accuracy};
pub use train_config::TrainConfig;
pub use epoch_stats::EpochStats;
