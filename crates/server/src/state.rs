//! Shared application state
//!
//! All model adapters are constructed once during startup and shared behind
//! trait objects; per-connection state lives in the session manager.

use std::sync::Arc;

use frontdesk_agent::SessionConfig;
use frontdesk_config::Settings;
use frontdesk_core::{ChatBackend, EmotionSensing, FrameSource, SpeechToText};
use frontdesk_vision::Annotate;

use crate::session::SessionManager;

/// Opens a fresh capture source for one streaming request.
pub type FrameSourceFactory =
    Arc<dyn Fn() -> frontdesk_core::Result<Box<dyn FrameSource>> + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    pub backend: Arc<dyn ChatBackend>,
    pub stt: Arc<dyn SpeechToText>,
    pub sensor: Arc<dyn EmotionSensing>,
    pub annotator: Arc<dyn Annotate>,
    pub frame_sources: FrameSourceFactory,
    pub session_config: SessionConfig,
}

impl AppState {
    pub fn new(
        settings: Settings,
        backend: Arc<dyn ChatBackend>,
        stt: Arc<dyn SpeechToText>,
        sensor: Arc<dyn EmotionSensing>,
        annotator: Arc<dyn Annotate>,
        frame_sources: FrameSourceFactory,
    ) -> Self {
        let sessions = Arc::new(SessionManager::new(settings.server.max_sessions));
        Self {
            settings: Arc::new(settings),
            sessions,
            backend,
            stt,
            sensor,
            annotator,
            frame_sources,
            session_config: SessionConfig::default(),
        }
    }
}
