//! Error taxonomy for the extraction pipeline.
//!
//! `Recording` and `MissingChannels` are expected operational conditions:
//! the driver logs them and moves on to the next recording. `Shape` and
//! `Format` indicate malformed input data and abort the current recording
//! without being swallowed. A segment that yields zero whole epochs is a
//! condition, not an error; see [`crate::epoch::split_into_epochs`].
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An array did not have the required rank or shape.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Channels required by the montage are absent from a recording.
    #[error("channels missing from '{file}': {missing:?}")]
    MissingChannels { file: String, missing: Vec<String> },

    /// A recording file could not be read.
    #[error("failed to read recording '{}'", path.display())]
    Recording {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A container file (safetensors or npz) is structurally malformed.
    #[error("malformed container: {0}")]
    Format(String),

    /// A caller-supplied argument is out of range or unusable.
    #[error("invalid argument: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ndarray::ShapeError> for Error {
    fn from(e: ndarray::ShapeError) -> Self {
        Error::Shape(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Format(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
