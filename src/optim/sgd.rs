use crate::layers::dense::{Dense, LayerGrads};

/// Plain stochastic gradient descent: `W ← W - lr·dW`, `b ← b - lr·db`.
/// No momentum, no adaptive learning rate.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to a layer given its pre-computed gradients.
    pub fn step(&self, layer: &mut Dense, grads: &LayerGrads) {
        layer.apply_gradients(grads, self.learning_rate);
    }
}
