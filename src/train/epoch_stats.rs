use serde::{Serialize, Deserialize};

/// Per-epoch training statistics produced by `train_loop`.
///
/// One value is assembled per reported epoch and written through the `log`
/// facade; callers that want programmatic access can recompute the same
/// numbers with `evaluate_loss` / `accuracy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Training loss after this epoch's update.
    pub train_loss: f64,
    /// Validation loss, if a validation set was provided.
    pub val_loss: Option<f64>,
    /// Training accuracy in [0, 1]; only set for CrossEntropy runs.
    pub train_accuracy: Option<f64>,
    /// Validation accuracy in [0, 1]; only set for CrossEntropy runs with a
    /// validation set.
    pub val_accuracy: Option<f64>,
}

impl std::fmt::Display for EpochStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "epoch {}/{} train_loss={:.6}",
            self.epoch, self.total_epochs, self.train_loss
        )?;
        if let Some(vl) = self.val_loss {
            write!(f, " val_loss={vl:.6}")?;
        }
        if let Some(ta) = self.train_accuracy {
            write!(f, " train_acc={ta:.4}")?;
        }
        if let Some(va) = self.val_accuracy {
            write!(f, " val_acc={va:.4}")?;
        }
        Ok(())
    }
}
