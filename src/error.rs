use thiserror::Error;

/// Library error type for flip-image operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The image's natural size could not be resolved.
    #[error("failed to load image {src}: {reason}")]
    ImageLoad { src: String, reason: String },

    /// A measured box or natural size cannot produce a finite correction.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Options rejected by `FlipOptions::validated`.
    #[error("invalid flip options: {0}")]
    InvalidOptions(String),

    /// `play()` was called before a required input was set.
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// The animated element left the document.
    #[error("element detached from the document")]
    Detached,

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn image_load(src: &str, reason: impl ToString) -> Self {
        Self::ImageLoad {
            src: src.to_owned(),
            reason: reason.to_string(),
        }
    }
}
