//! Speech processing traits

use async_trait::async_trait;

use crate::Result;

/// Speech-to-Text interface
///
/// Implementations:
/// - `WhisperTranscriber` - local whisper.cpp inference
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(WhisperTranscriber::new(config)?);
/// let text = stt.transcribe(&audio_bytes).await?;
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe a raw audio clip.
    ///
    /// The buffer is a complete encoded clip (container + samples), not a
    /// stream. Segment texts are joined with single spaces.
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStt;

    #[async_trait]
    impl SpeechToText for MockStt {
        async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
            Ok("test transcription".to_string())
        }

        fn model_name(&self) -> &str {
            "mock-stt"
        }
    }

    #[tokio::test]
    async fn test_mock_transcribe() {
        let stt = MockStt;
        assert_eq!(stt.transcribe(b"audio").await.unwrap(), "test transcription");
        assert_eq!(stt.model_name(), "mock-stt");
    }
}
