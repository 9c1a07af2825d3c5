//! Language model traits

use async_trait::async_trait;

use crate::{Message, Result};

/// Chat-completion backend interface
///
/// Implementations:
/// - `OpenAiBackend` - OpenAI-compatible chat completions API
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn ChatBackend> = Arc::new(OpenAiBackend::new(config)?);
/// let reply = llm.generate(&messages).await?;
/// ```
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    /// Generate one assistant reply for an ordered message sequence.
    async fn generate(&self, messages: &[Message]) -> Result<String>;

    /// Check whether the backend is reachable.
    async fn is_available(&self) -> bool;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockBackend;

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn generate(&self, messages: &[Message]) -> Result<String> {
            Ok(format!("echo of {} messages", messages.len()))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    #[tokio::test]
    async fn test_mock_backend() {
        let llm = MockBackend;
        assert!(llm.is_available().await);

        let messages = vec![Message::system("persona"), Message::user("hello")];
        let reply = llm.generate(&messages).await.unwrap();
        assert_eq!(reply, "echo of 2 messages");
    }
}
