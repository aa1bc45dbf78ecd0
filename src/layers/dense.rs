use serde::{Serialize, Deserialize};
use rand::Rng;

use crate::activation::activation::Activation;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// An upstream gradient entering a layer's backward pass, tagged with what it
/// is a gradient with respect to.
///
/// The fused softmax + cross-entropy gradient is already w.r.t. the
/// pre-activation logits; tagging it keeps the softmax Jacobian from being
/// applied a second time.
#[derive(Debug, Clone)]
pub enum Delta {
    /// dC/dY — gradient w.r.t. the layer's post-activation output.
    WrtOutput(Matrix),
    /// dC/dZ — gradient w.r.t. the layer's pre-activation values.
    WrtPreActivation(Matrix),
}

/// Parameter gradients for one layer. Shapes always equal the corresponding
/// parameter shapes.
#[derive(Debug, Clone)]
pub struct LayerGrads {
    pub weights: Matrix,
    pub biases: Matrix,
}

/// What one layer's backward pass produces: its parameter gradients plus the
/// error signal for the preceding layer.
#[derive(Debug)]
pub struct BackwardOutput {
    pub grads: LayerGrads,
    /// dC/dY of the previous layer (dC/dZ · Wᵗ). Ignored for the first layer.
    pub downstream: Matrix,
}

/// Values cached by a forward pass and consumed by the matching backward
/// pass. Lives for exactly one training step.
#[derive(Debug, Clone)]
struct ForwardCache {
    input: Matrix,
    z: Matrix,
    y: Matrix,
}

/// A fully connected layer: `Z = X·W + b`, `Y = activation(Z)`.
///
/// Weights are `(in_features, out_features)`, biases `1 × out_features`.
/// Parameters are mutated only by `apply_gradients`, once per training
/// iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activation: Activation,
    #[serde(skip)]
    cache: Option<ForwardCache>,
}

impl Dense {
    /// Creates a layer with activation-appropriate initialization:
    /// He for ReLU, Xavier otherwise. Biases start at zero.
    pub fn new<R: Rng>(
        in_features: usize,
        out_features: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Dense {
        let weights = match activation {
            Activation::ReLU => Matrix::he(in_features, out_features, rng),
            _ => Matrix::xavier(in_features, out_features, rng),
        };

        Dense {
            weights,
            biases: Matrix::zeros(1, out_features),
            activation,
            cache: None,
        }
    }

    /// Builds a layer from existing parameters, validating shapes.
    pub fn from_parts(weights: Matrix, biases: Matrix, activation: Activation) -> Result<Dense> {
        if biases.rows != 1 || biases.cols != weights.cols {
            return Err(Error::shape(
                "Dense::from_parts",
                format!("bias of shape 1x{}", weights.cols),
                format!("{}x{}", biases.rows, biases.cols),
            ));
        }
        Ok(Dense { weights, biases, activation, cache: None })
    }

    pub fn in_features(&self) -> usize {
        self.weights.rows
    }

    pub fn out_features(&self) -> usize {
        self.weights.cols
    }

    /// Forward pass over a `(batch, in_features)` input.
    ///
    /// Caches the input, pre-activation and output for the backward pass.
    /// The feature count is checked before any arithmetic runs.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        if input.cols != self.in_features() {
            return Err(Error::shape(
                "Dense::forward",
                format!("input with {} features", self.in_features()),
                format!("{}x{}", input.rows, input.cols),
            ));
        }

        let z = (input.clone() * self.weights.clone()).add_row_broadcast(&self.biases);
        let y = self.activation.apply(&z);

        self.cache = Some(ForwardCache {
            input: input.clone(),
            z,
            y: y.clone(),
        });

        Ok(y)
    }

    /// Backward pass. Consumes the forward cache.
    ///
    /// With cached input X and upstream gradient dC/dY (or dC/dZ directly,
    /// for the fused softmax + cross-entropy path):
    ///   dC/dZ = activation backprop of dC/dY
    ///   dC/dW = Xᵗ · dC/dZ
    ///   dC/db = column-sum of dC/dZ
    ///   downstream dC/dY_prev = dC/dZ · Wᵗ
    ///
    /// The 1/batch averaging is carried by the loss gradient, so these
    /// contractions are plain sums and the end-to-end parameter gradient is
    /// the exact derivative of the scalar loss.
    pub fn backward(&mut self, upstream: Delta) -> Result<BackwardOutput> {
        let cache = self.cache.take().ok_or(Error::MissingForwardCache)?;

        let dc_dz = match upstream {
            Delta::WrtOutput(dc_dy) => {
                self.check_delta_shape("Dense::backward", &dc_dy, &cache)?;
                self.activation.backprop(&dc_dy, &cache.z, &cache.y)
            }
            Delta::WrtPreActivation(dc_dz) => {
                self.check_delta_shape("Dense::backward", &dc_dz, &cache)?;
                dc_dz
            }
        };

        let w_grad = cache.input.transpose() * dc_dz.clone();
        let b_grad = dc_dz.column_sums();
        let downstream = dc_dz * self.weights.transpose();

        Ok(BackwardOutput {
            grads: LayerGrads { weights: w_grad, biases: b_grad },
            downstream,
        })
    }

    fn check_delta_shape(
        &self,
        context: &'static str,
        delta: &Matrix,
        cache: &ForwardCache,
    ) -> Result<()> {
        if delta.rows != cache.y.rows || delta.cols != cache.y.cols {
            return Err(Error::shape(
                context,
                format!("{}x{}", cache.y.rows, cache.y.cols),
                format!("{}x{}", delta.rows, delta.cols),
            ));
        }
        Ok(())
    }

    /// Applies pre-computed gradients scaled by lr: plain gradient descent.
    pub fn apply_gradients(&mut self, grads: &LayerGrads, lr: f64) {
        assert_eq!(grads.weights.rows, self.weights.rows);
        assert_eq!(grads.weights.cols, self.weights.cols);
        assert_eq!(grads.biases.cols, self.biases.cols);

        self.weights = self.weights.clone() - grads.weights.map(|x| x * lr);
        self.biases = self.biases.clone() - grads.biases.map(|x| x * lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_layer() -> Dense {
        // 2 -> 2, identity-free: ReLU with all-positive pre-activations.
        Dense::from_parts(
            Matrix::from_data(vec![vec![1.0, 0.5], vec![-0.5, 2.0]]),
            Matrix::from_data(vec![vec![0.1, 0.2]]),
            Activation::ReLU,
        )
        .unwrap()
    }

    #[test]
    fn forward_computes_xw_plus_b() {
        let mut layer = fixed_layer();
        let x = Matrix::from_data(vec![vec![1.0, 1.0]]);
        let y = layer.forward(&x).unwrap();
        // z = [1*1 + 1*(-0.5) + 0.1, 1*0.5 + 1*2 + 0.2] = [0.6, 2.7]
        assert!((y.data[0][0] - 0.6).abs() < 1e-12);
        assert!((y.data[0][1] - 2.7).abs() < 1e-12);
    }

    #[test]
    fn forward_rejects_wrong_feature_count() {
        let mut layer = fixed_layer();
        let x = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        let err = layer.forward(&x).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn from_parts_rejects_wrong_bias_length() {
        let err = Dense::from_parts(
            Matrix::zeros(2, 3),
            Matrix::zeros(1, 2),
            Activation::Sigmoid,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn backward_without_forward_is_an_error() {
        let mut layer = fixed_layer();
        let delta = Delta::WrtOutput(Matrix::zeros(1, 2));
        let err = layer.backward(delta).unwrap_err();
        assert!(matches!(err, Error::MissingForwardCache));
    }

    #[test]
    fn backward_consumes_the_cache() {
        let mut layer = fixed_layer();
        let x = Matrix::from_data(vec![vec![1.0, 1.0]]);
        layer.forward(&x).unwrap();
        layer.backward(Delta::WrtOutput(Matrix::zeros(1, 2))).unwrap();
        let err = layer.backward(Delta::WrtOutput(Matrix::zeros(1, 2))).unwrap_err();
        assert!(matches!(err, Error::MissingForwardCache));
    }

    #[test]
    fn gradient_shapes_equal_parameter_shapes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = Dense::new(4, 3, Activation::Sigmoid, &mut rng);
        let x = Matrix::random(5, 4, &mut rng);
        layer.forward(&x).unwrap();
        let out = layer.backward(Delta::WrtOutput(Matrix::random(5, 3, &mut rng))).unwrap();
        assert_eq!(out.grads.weights.rows, layer.weights.rows);
        assert_eq!(out.grads.weights.cols, layer.weights.cols);
        assert_eq!(out.grads.biases.rows, 1);
        assert_eq!(out.grads.biases.cols, layer.biases.cols);
        assert_eq!(out.downstream.rows, 5);
        assert_eq!(out.downstream.cols, 4);
    }
}
