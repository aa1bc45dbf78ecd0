use crate::loss::loss_type::LossType;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       — total number of full-batch gradient descent steps
/// - `loss_type`    — which loss function to use
/// - `report_every` — emit an `EpochStats` log line every this many epochs
///                    (and always for the final epoch); 0 disables reporting
pub struct TrainConfig {
    pub epochs: usize,
    pub loss_type: LossType,
    pub report_every: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, loss_type: LossType) -> Self {
        TrainConfig {
            epochs,
            loss_type,
            report_every: 50,
        }
    }
}
