//! Audio decoding and speech-to-text
//!
//! Adapts a raw audio clip (WAV container) to the whisper model's 16 kHz mono
//! waveform and decodes it with a fixed beam width.

pub mod audio;
pub mod whisper;

pub use audio::decode_clip;
pub use whisper::{SttConfig, WhisperTranscriber};

use thiserror::Error;

/// Speech errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Transcription error: {0}")]
    Transcription(String),
}

impl From<SpeechError> for frontdesk_core::Error {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Audio(msg) => frontdesk_core::Error::Audio(msg),
            SpeechError::Model(msg) => frontdesk_core::Error::ModelUnavailable(msg),
            SpeechError::Transcription(msg) => frontdesk_core::Error::Transcription(msg),
        }
    }
}
