use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::error::Result;
use crate::loss::loss_type::LossType;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `input_size` — number of neurons feeding into this layer (i.e. the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `activation` — activation function applied after the linear transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: Activation,
}

/// A fully serializable description of a network architecture plus the loss
/// it should be trained with.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of trained
/// weights, so architecture configurations can be stored before any training
/// starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Loss function to pair with this network during training.
    pub loss: LossType,
}

impl NetworkSpec {
    /// Instantiates a freshly initialized network from this spec, drawing
    /// weights from the caller's generator.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Network> {
        let triples = self.layers.iter()
            .map(|layer| (layer.input_size, layer.size, layer.activation))
            .collect();
        Network::new(triples, rng)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn iris_spec() -> NetworkSpec {
        NetworkSpec {
            name: "iris".into(),
            layers: vec![
                LayerSpec { size: 16, input_size: 4, activation: Activation::ReLU },
                LayerSpec { size: 16, input_size: 16, activation: Activation::ReLU },
                LayerSpec { size: 3, input_size: 16, activation: Activation::Softmax },
            ],
            loss: LossType::CrossEntropy,
        }
    }

    #[test]
    fn build_produces_matching_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(11);
        let net = iris_spec().build(&mut rng).unwrap();
        assert_eq!(net.layers.len(), 3);
        assert_eq!(net.layers[0].in_features(), 4);
        assert_eq!(net.layers[2].out_features(), 3);
    }

    #[test]
    fn build_rejects_inconsistent_specs() {
        let mut spec = iris_spec();
        spec.layers[1].input_size = 7;
        let mut rng = StdRng::seed_from_u64(11);
        assert!(matches!(spec.build(&mut rng), Err(Error::Config(_))));
    }
}
