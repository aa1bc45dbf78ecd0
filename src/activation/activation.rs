use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

/// The closed set of activation functions.
///
/// A fixed enum dispatched by `match` rather than a trait object: the set is
/// small and known, and the softmax case needs whole-row treatment that an
/// element-wise trait signature cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    ReLU,
    /// Softmax is vector-valued and applied row-wise over the batch; the
    /// element-wise `function()`/`derivative()` paths are not used for it.
    Softmax,
}

/// Logistic sigmoid with hard clamps.
///
/// For |x| >= 45, e^-x would overflow the useful f64 range anyway, so the
/// output is pinned to exactly 1.0 / 0.0. The clamp is a numerical-stability
/// policy and part of the function's contract, not an approximation.
fn sigmoid(x: f64) -> f64 {
    if x >= 45.0 {
        return 1.0;
    }
    if x <= -45.0 {
        return 0.0;
    }
    1.0 / (1.0 + E.powf(-x))
}

impl Activation {
    /// Element-wise activation. Not defined for `Softmax`, which has no
    /// per-element form; `apply()` handles that variant.
    fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::ReLU => if x > 0.0 { x } else { 0.0 },
            Activation::Softmax => {
                unreachable!("softmax is applied row-wise by Activation::apply()")
            }
        }
    }

    /// Element-wise derivative, for the diagonal-Jacobian activations.
    ///
    /// ReLU takes the subgradient 0 at exactly 0.
    fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            Activation::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::Softmax => {
                unreachable!("softmax has a dense Jacobian; see Activation::backprop()")
            }
        }
    }

    /// Applies the activation to a batch of pre-activations `z`.
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            Activation::Softmax => {
                let data = z.data.iter().map(|row| softmax_row(row)).collect();
                Matrix::from_data(data)
            }
            _ => z.map(|x| self.function(x)),
        }
    }

    /// Converts an upstream gradient w.r.t. this activation's output into the
    /// gradient w.r.t. its pre-activation input: dC/dZ from dC/dY.
    ///
    /// Sigmoid and ReLU have diagonal Jacobians, so the contraction is a
    /// Hadamard product with the element-wise derivative at `z`. Softmax has
    /// a dense per-row Jacobian `diag(y) - y⊗y`; each batch row of `dc_dy`
    /// is multiplied against that row's Jacobian.
    pub fn backprop(&self, dc_dy: &Matrix, z: &Matrix, y: &Matrix) -> Matrix {
        match self {
            Activation::Softmax => {
                let data = dc_dy.data.iter().zip(y.data.iter())
                    .map(|(dy_row, y_row)| {
                        let jac = softmax_jacobian(y_row);
                        let dz = Matrix::from_data(vec![dy_row.clone()]) * jac;
                        dz.data.into_iter().next().unwrap_or_default()
                    })
                    .collect();
                Matrix::from_data(data)
            }
            _ => dc_dy.hadamard(&z.map(|x| self.derivative(x))),
        }
    }
}

/// Row-wise softmax with the max-subtraction trick: shifting every element by
/// the row maximum leaves the result unchanged but keeps the exponentials in
/// range.
fn softmax_row(row: &[f64]) -> Vec<f64> {
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = row.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Dense Jacobian of softmax for one row: J = diag(y) - y⊗y.
///
/// Every output component depends on every input component, so unlike the
/// other activations this cannot be reduced to an element-wise factor.
fn softmax_jacobian(y: &[f64]) -> Matrix {
    let n = y.len();
    let mut jac = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            jac.data[i][j] = if i == j {
                y[i] * (1.0 - y[i])
            } else {
                -y[i] * y[j]
            };
        }
    }
    jac
}
