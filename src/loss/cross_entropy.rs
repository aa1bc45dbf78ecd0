use crate::math::matrix::Matrix;

/// Categorical cross-entropy, for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Predictions are clipped to [ε, 1-ε] before the logarithm. Narrower than
/// the binary cross-entropy epsilon on purpose; see DESIGN.md.
const EPS: f64 = 1e-15;

impl CrossEntropyLoss {
    /// Scalar loss: -sum(expected · ln(clip(predicted))) / batch_size.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let batch = predicted.rows as f64;
        let sum: f64 = predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(p_row, e_row)| p_row.iter().zip(e_row.iter()))
            .map(|(p, e)| e * clip(*p).ln())
            .sum();
        -sum / batch
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the
    /// pre-softmax logits: (predicted - expected) / batch_size.
    ///
    /// This simplification holds only when the final layer's activation is
    /// Softmax; the trainer validates the pairing before using it. The
    /// backward pass treats this delta as already being in pre-activation
    /// space, so the softmax Jacobian is never applied on top of it.
    pub fn derivative_wrt_logits(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let batch = predicted.rows as f64;
        let data = predicted.data.iter().zip(expected.data.iter())
            .map(|(p_row, e_row)| {
                p_row.iter().zip(e_row.iter())
                    .map(|(p, e)| (clip(*p) - e) / batch)
                    .collect()
            })
            .collect();
        Matrix::from_data(data)
    }
}

fn clip(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}
