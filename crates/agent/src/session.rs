//! Conversation session
//!
//! An append-only message log with a two-state lifecycle. `submit` is
//! buffer-and-commit: the staged user message and the generated reply are
//! appended together only after the backend call succeeds, so a failed call
//! can never leave an orphaned user message in the log.

use std::sync::Arc;

use parking_lot::RwLock;

use frontdesk_config::PromptTemplates;
use frontdesk_core::{ChatBackend, Message, Role};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Just created or reset; only the seeded persona + greeting are logged.
    Fresh,
    /// At least one exchange completed.
    Active,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Built system persona text
    pub persona: String,
    /// Fixed assistant greeting seeded on reset
    pub greeting: String,
    /// Fixed apology returned when generation fails
    pub fallback: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let templates = PromptTemplates::default();
        Self {
            persona: templates.system_prompt.build(),
            greeting: templates.system_prompt.greeting,
            fallback: templates.fallbacks.generation_failure,
        }
    }
}

/// Conversation session
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    config: SessionConfig,
    log: RwLock<Vec<Message>>,
    state: RwLock<SessionState>,
}

impl ChatSession {
    /// Create a session, seeded as if `reset` had just been called.
    pub fn new(backend: Arc<dyn ChatBackend>, config: SessionConfig) -> Self {
        let session = Self {
            backend,
            config,
            log: RwLock::new(Vec::new()),
            state: RwLock::new(SessionState::Fresh),
        };
        session.reset();
        session
    }

    /// Clear the log and reseed the persona and greeting.
    ///
    /// Always leaves exactly two messages, regardless of prior state.
    pub fn reset(&self) {
        let mut log = self.log.write();
        log.clear();
        log.push(Message::system(&self.config.persona));
        log.push(Message::assistant(&self.config.greeting));
        *self.state.write() = SessionState::Fresh;
    }

    /// Submit a user message and return the assistant reply.
    ///
    /// On backend failure the log and state are untouched and the fixed
    /// fallback string is returned. No lock is held across the backend call.
    pub async fn submit(&self, user_text: &str) -> String {
        let staged = Message::user(user_text);

        let mut request = self.log.read().clone();
        request.push(staged.clone());

        match self.backend.generate(&request).await {
            Ok(reply) => {
                let mut log = self.log.write();
                log.push(staged);
                log.push(Message::assistant(&reply));
                *self.state.write() = SessionState::Active;
                reply
            }
            Err(e) => {
                tracing::error!(operation = "chat_generation", error = %e, "generation failed, returning fallback");
                self.config.fallback.clone()
            }
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn message_count(&self) -> usize {
        self.log.read().len()
    }

    /// Snapshot of the ordered log.
    pub fn messages(&self) -> Vec<Message> {
        self.log.read().clone()
    }

    /// The first message is always the system persona.
    pub fn persona_seeded(&self) -> bool {
        self.log
            .read()
            .first()
            .map(|m| m.role == Role::System)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use frontdesk_core::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoBackend {
        calls: AtomicUsize,
    }

    impl EchoBackend {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn generate(&self, messages: &[Message]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("reply to: {}", messages.last().unwrap().content))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn generate(&self, _messages: &[Message]) -> Result<String> {
            Err(Error::Generation("service down".to_string()))
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_new_session_is_seeded() {
        let session = ChatSession::new(Arc::new(EchoBackend::new()), SessionConfig::default());
        assert_eq!(session.state(), SessionState::Fresh);
        assert_eq!(session.message_count(), 2);
        assert!(session.persona_seeded());

        let messages = session.messages();
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(
            messages[1].content,
            "Hello, I am Check-in Charlie! How can I help you today?"
        );
    }

    #[tokio::test]
    async fn test_submit_commits_user_and_assistant_together() {
        let session = ChatSession::new(Arc::new(EchoBackend::new()), SessionConfig::default());

        let reply = session.submit("I'd like to check in").await;
        assert_eq!(reply, "reply to: I'd like to check in");
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.message_count(), 4);

        let messages = session.messages();
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].content, "I'd like to check in");
        assert_eq!(messages[3].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_failed_submit_leaves_log_untouched() {
        let session = ChatSession::new(Arc::new(FailingBackend), SessionConfig::default());
        let before = session.message_count();

        let reply = session.submit("I'd like to check in").await;
        assert_eq!(
            reply,
            "Sorry, something went wrong with Charlie. Please try again."
        );
        assert_eq!(session.message_count(), before);
        assert_eq!(session.state(), SessionState::Fresh);
    }

    #[tokio::test]
    async fn test_staged_message_is_sent_to_backend() {
        struct AssertingBackend;

        #[async_trait]
        impl ChatBackend for AssertingBackend {
            async fn generate(&self, messages: &[Message]) -> Result<String> {
                // Persona, greeting, then the staged user message.
                assert_eq!(messages.len(), 3);
                assert_eq!(messages[0].role, Role::System);
                assert_eq!(messages[2].role, Role::User);
                Ok("ok".to_string())
            }

            async fn is_available(&self) -> bool {
                true
            }

            fn model_name(&self) -> &str {
                "asserting"
            }
        }

        let session = ChatSession::new(Arc::new(AssertingBackend), SessionConfig::default());
        session.submit("hello").await;
    }

    #[tokio::test]
    async fn test_reset_after_activity_yields_exactly_two_messages() {
        let session = ChatSession::new(Arc::new(EchoBackend::new()), SessionConfig::default());
        session.submit("one").await;
        session.submit("two").await;
        assert_eq!(session.message_count(), 6);

        session.reset();
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.state(), SessionState::Fresh);
        assert!(session.persona_seeded());
    }
}
