//! Session Management
//!
//! One session per client connection, created on socket open and removed on
//! close. Each session owns its own conversation log and emotion window, so
//! concurrent clients never share state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};

use frontdesk_agent::DeskAgent;
use frontdesk_vision::run_stream_loop;

use crate::state::AppState;
use crate::ws::ServerEvent;
use crate::ServerError;

/// Per-connection session state
pub struct Session {
    /// Session ID
    pub id: String,
    /// Desk agent owning this connection's conversation and emotion window
    pub agent: DeskAgent,
    /// Stop signal of the active streaming loop, if one is running
    stream_stop: Mutex<Option<watch::Sender<bool>>>,
}

impl Session {
    fn new(id: impl Into<String>, agent: DeskAgent) -> Self {
        Self {
            id: id.into(),
            agent,
            stream_stop: Mutex::new(None),
        }
    }

    /// Start the frame streaming loop for this session.
    ///
    /// Idempotent: a second request while a stream is running is ignored.
    /// Encoded frames flow to `out_tx` as base64 `frame` events; the loop
    /// ends when the capture source exhausts, the connection goes away, or
    /// [`Session::stop_stream`] fires.
    pub fn start_stream(self: &Arc<Self>, state: &AppState, out_tx: mpsc::Sender<ServerEvent>) {
        let mut guard = self.stream_stop.lock();
        if guard.is_some() {
            tracing::debug!(session_id = %self.id, "stream already running, ignoring request");
            return;
        }

        let source = match (state.frame_sources)() {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(session_id = %self.id, operation = "capture_open", error = %e, "failed to open capture source");
                return;
            }
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        let (frame_tx, mut frame_rx) = mpsc::channel::<Vec<u8>>(4);

        let sensor = Arc::clone(&state.sensor);
        let annotator = Arc::clone(&state.annotator);
        let window = Arc::clone(self.agent.window());
        let session_id = self.id.clone();

        tokio::task::spawn_blocking(move || {
            let outcome = run_stream_loop(source, sensor, window, annotator, frame_tx, stop_rx);
            tracing::info!(session_id = %session_id, ?outcome, "frame stream ended");
        });

        // Forward encoded frames to the socket as base64 payloads.
        let session = Arc::clone(self);
        tokio::spawn(async move {
            use base64::Engine as _;
            while let Some(bytes) = frame_rx.recv().await {
                let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
                if out_tx.send(ServerEvent::Frame(payload)).await.is_err() {
                    break;
                }
            }
            // Loop is gone (exhausted or cancelled); allow a fresh request.
            session.stream_stop.lock().take();
        });

        *guard = Some(stop_tx);
    }

    /// Signal the streaming loop to stop.
    pub fn stop_stream(&self) {
        if let Some(stop) = self.stream_stop.lock().take() {
            let _ = stop.send(true);
        }
    }

    /// Whether a streaming loop is currently attached.
    pub fn is_streaming(&self) -> bool {
        self.stream_stop.lock().is_some()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Create a session for a new connection.
    ///
    /// The agent arrives freshly reset: persona and greeting are already
    /// seeded.
    pub fn create(&self, agent: DeskAgent) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            return Err(ServerError::Session("Max sessions reached".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id, agent));
        sessions.insert(id.clone(), session.clone());

        tracing::info!(session_id = %id, "created session");

        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session, stopping any active stream.
    pub fn remove(&self, id: &str) {
        let session = self.sessions.write().remove(id);
        if let Some(session) = session {
            session.stop_stream();
            tracing::info!(session_id = %id, "removed session");
        }
    }

    /// Active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// List all session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use frontdesk_agent::SessionConfig;
    use frontdesk_core::{ChatBackend, Message, SpeechToText};
    use frontdesk_vision::EmotionWindow;

    struct MockBackend;

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn generate(&self, _messages: &[Message]) -> frontdesk_core::Result<String> {
            Ok("ok".to_string())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    struct MockStt;

    #[async_trait]
    impl SpeechToText for MockStt {
        async fn transcribe(&self, _audio: &[u8]) -> frontdesk_core::Result<String> {
            Ok(String::new())
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    fn test_agent() -> DeskAgent {
        DeskAgent::new(
            Arc::new(MockBackend),
            Arc::new(MockStt),
            Arc::new(EmotionWindow::new(20)),
            SessionConfig::default(),
        )
    }

    #[test]
    fn test_session_create_get_remove() {
        let manager = SessionManager::new(10);
        let session = manager.create(test_agent()).unwrap();
        let id = session.id.clone();

        assert!(manager.get(&id).is_some());
        assert_eq!(manager.count(), 1);

        manager.remove(&id);
        assert!(manager.get(&id).is_none());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let manager = SessionManager::new(10);
        let a = manager.create(test_agent()).unwrap();
        let b = manager.create(test_agent()).unwrap();

        a.agent.window().observe(frontdesk_core::Emotion::Sad);
        assert_eq!(a.agent.window().len(), 1);
        assert_eq!(b.agent.window().len(), 0);
    }

    #[test]
    fn test_max_sessions_enforced() {
        let manager = SessionManager::new(1);
        let _first = manager.create(test_agent()).unwrap();
        assert!(manager.create(test_agent()).is_err());
    }

    #[test]
    fn test_new_session_is_seeded() {
        let manager = SessionManager::new(10);
        let session = manager.create(test_agent()).unwrap();
        assert_eq!(session.agent.session().message_count(), 2);
        assert!(!session.is_streaming());
    }
}
