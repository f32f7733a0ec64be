// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the landmark extraction library.

use std::fmt;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Main error type for the landmark extraction library.
#[derive(Debug)]
pub enum ExtractError {
    /// Video path missing or unreadable. Batch processing reports this and
    /// continues with the next file.
    SourceNotFound(String),
    /// Video decoding error.
    VideoError(String),
    /// Error loading an ONNX landmark model.
    ModelLoadError(String),
    /// Error while running the landmark detector on a frame.
    DetectionError(String),
    /// Detector returned an unexpected landmark count (not 33 pose points or
    /// 21 hand points). Fails the current frame's encoding.
    ShapeMismatch(String),
    /// A frame vector did not have length 258 at document finalization, or
    /// the JSON write itself failed. Nothing partial is persisted.
    SerializationError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// IO error (file not found, permission denied, etc.).
    IoError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound(msg) => write!(f, "Source not found: {msg}"),
            Self::VideoError(msg) => write!(f, "Video error: {msg}"),
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::DetectionError(msg) => write!(f, "Detection error: {msg}"),
            Self::ShapeMismatch(msg) => write!(f, "Shape mismatch: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
