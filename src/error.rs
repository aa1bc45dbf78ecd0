use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes surfaced by this crate.
///
/// Shape and configuration problems are detected before any arithmetic runs;
/// dataset problems abort the whole load. Numerical edge cases (sigmoid
/// clamping, loss epsilons) are handled silently by policy and never appear
/// here.
#[derive(Debug, Error)]
pub enum Error {
    /// A tensor dimension disagrees with what an operation requires.
    #[error("shape mismatch in {context}: expected {expected}, got {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },

    /// A dataset row or label could not be interpreted.
    #[error("malformed dataset: {0}")]
    DataParse(String),

    /// Invalid network architecture or loss/activation pairing.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// `backward` was called on a layer with no cached forward pass.
    #[error("backward pass called without a cached forward pass")]
    MissingForwardCache,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("model serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor used by shape checks throughout the crate.
    pub(crate) fn shape(
        context: &'static str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Error {
        Error::ShapeMismatch {
            context,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
