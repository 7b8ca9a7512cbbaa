use thiserror::Error;

/// Failure while fetching or decoding an asset. Callers log these and move on;
/// nothing retries.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model has no scene to instantiate")]
    EmptyScene,
    #[error("mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPositions { mesh: usize, primitive: usize },
    #[error("invalid showcase config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid showcase config: {0}")]
    InvalidConfig(String),
    #[error("background face {face} is not a readable image: {source}")]
    Image {
        face: usize,
        #[source]
        source: image::ImageError,
    },
    #[error("background face {face}: {reason}")]
    CubeFace { face: usize, reason: String },
}

impl LoadError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
