use crate::math::matrix::Matrix;

/// Mean squared error over all elements.
pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²) over every element.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let n = (predicted.rows * predicted.cols) as f64;
        predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(p_row, e_row)| p_row.iter().zip(e_row.iter()))
            .map(|(p, e)| (e - p) * (e - p))
            .sum::<f64>() / n
    }

    /// Gradient w.r.t. the prediction: 2(predicted - expected)/N, where N is
    /// the total element count — the exact derivative of `loss`.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = (predicted.rows * predicted.cols) as f64;
        let data = predicted.data.iter().zip(expected.data.iter())
            .map(|(p_row, e_row)| {
                p_row.iter().zip(e_row.iter())
                    .map(|(p, e)| 2.0 * (p - e) / n)
                    .collect()
            })
            .collect();
        Matrix::from_data(data)
    }
}
