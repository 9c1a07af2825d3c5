//! Whisper transcription adapter
//!
//! Loads the model once at startup; each call decodes the clip, runs
//! beam-search decoding on a blocking worker, and joins the segment texts
//! with single spaces.

use std::sync::Arc;

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use frontdesk_config::SttSettings;
use frontdesk_core::{Result, SpeechToText};

use crate::{audio, SpeechError};

/// Transcriber configuration
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// Path to the whisper GGML model file
    pub model_path: String,
    /// Beam width for decoding
    pub beam_width: usize,
    /// Hint language ("auto" to detect)
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_path: "models/ggml-base.bin".to_string(),
            beam_width: 5,
            language: "en".to_string(),
        }
    }
}

impl From<&SttSettings> for SttConfig {
    fn from(settings: &SttSettings) -> Self {
        Self {
            model_path: settings.model_path.clone(),
            beam_width: settings.beam_width,
            language: settings.language.clone(),
        }
    }
}

/// Whisper speech-to-text adapter
pub struct WhisperTranscriber {
    context: Arc<WhisperContext>,
    config: SttConfig,
}

impl WhisperTranscriber {
    /// Load the model. A load failure is fatal at startup.
    pub fn new(config: SttConfig) -> std::result::Result<Self, SpeechError> {
        let context = WhisperContext::new_with_params(
            &config.model_path,
            WhisperContextParameters::default(),
        )
        .map_err(|e| SpeechError::Model(format!("failed to load {}: {}", config.model_path, e)))?;

        tracing::info!(model = %config.model_path, beam_width = config.beam_width, "whisper model loaded");

        Ok(Self {
            context: Arc::new(context),
            config,
        })
    }
}

#[async_trait]
impl SpeechToText for WhisperTranscriber {
    async fn transcribe(&self, audio_bytes: &[u8]) -> Result<String> {
        let samples = audio::decode_clip(audio_bytes)?;
        if samples.is_empty() {
            return Ok(String::new());
        }

        let context = Arc::clone(&self.context);
        let beam_size = self.config.beam_width as std::ffi::c_int;
        let language = self.config.language.clone();

        let transcript = tokio::task::spawn_blocking(move || {
            let mut state = context
                .create_state()
                .map_err(|e| SpeechError::Transcription(e.to_string()))?;

            let mut params = FullParams::new(SamplingStrategy::BeamSearch {
                beam_size,
                patience: -1.0,
            });
            params.set_translate(false);
            params.set_print_special(false);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);
            if language != "auto" {
                params.set_language(Some(&language));
            }

            state
                .full(params, &samples)
                .map_err(|e| SpeechError::Transcription(e.to_string()))?;

            let segments = state
                .full_n_segments()
                .map_err(|e| SpeechError::Transcription(e.to_string()))?;

            let mut transcript = String::new();
            for i in 0..segments {
                let text = state
                    .full_get_segment_text(i)
                    .map_err(|e| SpeechError::Transcription(e.to_string()))?;
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if !transcript.is_empty() {
                    transcript.push(' ');
                }
                transcript.push_str(trimmed);
            }

            Ok::<String, SpeechError>(transcript)
        })
        .await
        .map_err(|e| SpeechError::Transcription(format!("decode task failed: {}", e)))??;

        Ok(transcript)
    }

    fn model_name(&self) -> &str {
        &self.config.model_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let settings = SttSettings::default();
        let config = SttConfig::from(&settings);
        assert_eq!(config.beam_width, 5);
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let result = WhisperTranscriber::new(SttConfig {
            model_path: "/nonexistent/model.bin".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(SpeechError::Model(_))));
    }
}
