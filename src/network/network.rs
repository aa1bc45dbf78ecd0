use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::error::{Error, Result};
use crate::layers::dense::{Delta, Dense, LayerGrads};
use crate::math::matrix::Matrix;

/// A stack of fully connected layers.
///
/// The only state that persists across training steps is the layer
/// parameters; forward caches live inside each layer for exactly one step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Dense>,
}

impl Network {
    /// Builds a network from `(in_features, out_features, activation)`
    /// triples, validating that adjacent layer sizes agree.
    pub fn new<R: Rng>(
        layer_specs: Vec<(usize, usize, Activation)>,
        rng: &mut R,
    ) -> Result<Network> {
        if layer_specs.is_empty() {
            return Err(Error::Config("network needs at least one layer".into()));
        }
        for (i, pair) in layer_specs.windows(2).enumerate() {
            let (_, out_features, _) = pair[0];
            let (in_features, _, _) = pair[1];
            if out_features != in_features {
                return Err(Error::Config(format!(
                    "layer {} produces {} features but layer {} expects {}",
                    i, out_features, i + 1, in_features,
                )));
            }
        }

        let layers = layer_specs.into_iter()
            .map(|(input, output, activation)| Dense::new(input, output, activation, rng))
            .collect();
        Ok(Network { layers })
    }

    /// Forward pass over a `(batch, in_features)` matrix; each layer caches
    /// its intermediates for the backward pass.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Backward pass, last layer to first. Takes the loss gradient and
    /// returns one `LayerGrads` per layer, in layer order.
    ///
    /// Each layer's backward step consumes its forward cache and hands the
    /// propagated error (dC/dZ · Wᵗ) to the layer before it.
    pub fn backward(&mut self, loss_delta: Delta) -> Result<Vec<LayerGrads>> {
        let mut grads = Vec::with_capacity(self.layers.len());
        let mut upstream = loss_delta;

        for layer in self.layers.iter_mut().rev() {
            let out = layer.backward(upstream)?;
            upstream = Delta::WrtOutput(out.downstream);
            grads.push(out.grads);
        }

        grads.reverse();
        Ok(grads)
    }

    /// The activation of the final layer, used to validate loss pairings.
    pub fn output_activation(&self) -> Option<Activation> {
        self.layers.last().map(|layer| layer.activation)
    }

    /// Serializes the network parameters to a pretty-printed JSON file.
    /// Forward caches are transient and not persisted.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
