//! Error types shared across the front desk agent

use thiserror::Error;

/// Top-level error taxonomy.
///
/// `ModelUnavailable` is fatal at startup; everything else is caught at the
/// event boundary and resolved to a fallback reply or an error payload.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A model or asset failed to load. Aborts process start.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A single detection/classification call failed. Caught per frame.
    #[error("inference error: {0}")]
    Inference(String),

    /// The text-generation service call failed. Session state is unchanged.
    #[error("generation error: {0}")]
    Generation(String),

    /// The speech-to-text call failed. Surfaced as a distinct error payload.
    #[error("transcription error: {0}")]
    Transcription(String),

    /// An audio clip could not be decoded into the model's waveform format.
    #[error("audio error: {0}")]
    Audio(String),

    /// Frame acquisition failed. Exhaustion is `Ok(None)`, not this.
    #[error("capture error: {0}")]
    Capture(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Transcription("bad container".to_string());
        assert_eq!(err.to_string(), "transcription error: bad container");
    }
}
