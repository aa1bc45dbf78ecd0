use crate::math::matrix::Matrix;

/// Binary cross-entropy for sigmoid outputs.
pub struct BceLoss;

/// Epsilon added inside each logarithm to avoid log(0). Deliberately wider
/// than the categorical cross-entropy clip; see DESIGN.md.
const EPS: f64 = 1e-7;

impl BceLoss {
    /// Scalar BCE: -mean(y·ln(p+ε) + (1-y)·ln(1-p+ε)) over every element.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let n = (predicted.rows * predicted.cols) as f64;
        let sum: f64 = predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(p_row, e_row)| p_row.iter().zip(e_row.iter()))
            .map(|(p, y)| y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln())
            .sum();
        -sum / n
    }

    /// Exact derivative of `loss` w.r.t. the prediction:
    /// ((1-y)/(1-p+ε) - y/(p+ε)) / N.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = (predicted.rows * predicted.cols) as f64;
        let data = predicted.data.iter().zip(expected.data.iter())
            .map(|(p_row, e_row)| {
                p_row.iter().zip(e_row.iter())
                    .map(|(p, y)| ((1.0 - y) / (1.0 - p + EPS) - y / (p + EPS)) / n)
                    .collect()
            })
            .collect();
        Matrix::from_data(data)
    }
}
