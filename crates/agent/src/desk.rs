//! Per-connection desk agent
//!
//! Composes the conversation session with the emotion window and the
//! transcription adapter. Chat replies are conditioned on the window's
//! current dominant emotion; transcription is a separate event and never
//! feeds the chat log itself.

use std::sync::Arc;

use frontdesk_core::{ChatBackend, Emotion, Result, SpeechToText};
use frontdesk_vision::EmotionWindow;

use crate::session::{ChatSession, SessionConfig};

/// Append the emotion annotation clause to the user's text.
///
/// Only this derived form is ever logged as a user message.
pub fn augment_user_text(text: &str, emotion: Emotion) -> String {
    format!(
        "{}. The user's current emotion is {}.",
        text.trim_end(),
        emotion
    )
}

/// Front desk agent for one client connection.
pub struct DeskAgent {
    session: ChatSession,
    window: Arc<EmotionWindow>,
    stt: Arc<dyn SpeechToText>,
}

impl DeskAgent {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        stt: Arc<dyn SpeechToText>,
        window: Arc<EmotionWindow>,
        config: SessionConfig,
    ) -> Self {
        Self {
            session: ChatSession::new(backend, config),
            window,
            stt,
        }
    }

    /// Reset the conversation (connect / refresh).
    pub fn reset(&self) {
        self.session.reset();
    }

    /// Handle one chat message: read the current dominant emotion, submit the
    /// augmented input, return the reply text.
    pub async fn handle_chat(&self, text: &str) -> String {
        let emotion = self.window.dominant();
        let augmented = augment_user_text(text, emotion);
        tracing::debug!(emotion = %emotion, "dispatching chat message");
        self.session.submit(&augmented).await
    }

    /// Handle one audio clip: return the transcript or a transcription error.
    ///
    /// The caller is responsible for feeding a transcript back in as a chat
    /// message; this never touches the conversation log.
    pub async fn handle_audio(&self, audio: &[u8]) -> Result<String> {
        self.stt.transcribe(audio).await
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn window(&self) -> &Arc<EmotionWindow> {
        &self.window
    }
}
