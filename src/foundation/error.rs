use crate::foundation::core::FrameIndex;

/// Convenience result type used across petgif.
pub type GifResult<T> = Result<T, GifError>;

/// Top-level error taxonomy for a render call.
///
/// A render either produces a complete [`EncodedGif`](crate::EncodedGif) or fails with exactly one
/// of these; partial output is never returned.
#[derive(thiserror::Error, Debug)]
pub enum GifError {
    /// Invalid render parameters or frame set, detected before any worker is dispatched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A per-frame compositing failure.
    #[error("synthesis error at frame {frame}: {message}")]
    Synthesis {
        /// Frame whose synthesis failed.
        frame: FrameIndex,
        /// Rendered cause chain.
        message: String,
    },

    /// Encoder state or output failure.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The completion barrier stopped waiting before every frame reported back.
    #[error("interrupted wait: {0}")]
    InterruptedWait(String),

    /// Errors when serializing or deserializing parameters.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifError {
    /// Build a [`GifError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`GifError::Synthesis`] value from the collaborator's error.
    pub fn synthesis(frame: FrameIndex, cause: impl std::fmt::Display) -> Self {
        Self::Synthesis {
            frame,
            message: format!("{cause:#}"),
        }
    }

    /// Build a [`GifError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`GifError::InterruptedWait`] value.
    pub fn interrupted(msg: impl Into<String>) -> Self {
        Self::InterruptedWait(msg.into())
    }

    /// Build a [`GifError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<gif::EncodingError> for GifError {
    fn from(e: gif::EncodingError) -> Self {
        Self::Encoding(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
