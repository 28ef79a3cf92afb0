use std::path::PathBuf;

/// Convenience result type used across loopcam.
pub type LoopcamResult<T> = Result<T, LoopcamError>;

/// Top-level error taxonomy used by the synthesizer and its sinks.
#[derive(thiserror::Error, Debug)]
pub enum LoopcamError {
    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The source image is missing or could not be decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A file could not be created or written.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// Path the failed operation targeted.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Errors raised while streaming frames into an encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopcamError {
    /// Build a [`LoopcamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoopcamError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`LoopcamError::Io`] value for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`LoopcamError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
