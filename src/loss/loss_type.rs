use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::layers::dense::Delta;
use crate::loss::bce::BceLoss;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Selects which loss function the training loop uses.
///
/// - `Mse`                — mean squared error; pair with Sigmoid or ReLU output.
/// - `BinaryCrossEntropy` — pair with a Sigmoid output.
/// - `CrossEntropy`       — categorical cross-entropy; pair with a Softmax
///   output. Its gradient is the fused Softmax+CE gradient w.r.t. the logits,
///   tagged `Delta::WrtPreActivation` so the Jacobian is not applied twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    BinaryCrossEntropy,
    CrossEntropy,
}

impl LossType {
    /// Scalar loss over a batch. Predicted and expected shapes must agree.
    pub fn loss(&self, predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        check_shapes(predicted, expected)?;
        Ok(match self {
            LossType::Mse => MseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
        })
    }

    /// Gradient of the loss, tagged with the space it lives in.
    pub fn derivative(&self, predicted: &Matrix, expected: &Matrix) -> Result<Delta> {
        check_shapes(predicted, expected)?;
        Ok(match self {
            LossType::Mse => Delta::WrtOutput(MseLoss::derivative(predicted, expected)),
            LossType::BinaryCrossEntropy => {
                Delta::WrtOutput(BceLoss::derivative(predicted, expected))
            }
            LossType::CrossEntropy => Delta::WrtPreActivation(
                CrossEntropyLoss::derivative_wrt_logits(predicted, expected),
            ),
        })
    }
}

fn check_shapes(predicted: &Matrix, expected: &Matrix) -> Result<()> {
    if predicted.rows != expected.rows || predicted.cols != expected.cols {
        return Err(Error::shape(
            "loss",
            format!("{}x{}", predicted.rows, predicted.cols),
            format!("{}x{}", expected.rows, expected.cols),
        ));
    }
    Ok(())
}
