//! WebSocket event surface
//!
//! One socket per client connection. Text frames carry a JSON envelope
//! `{"event": ..., "data": ...}`; binary frames carry a raw audio clip for
//! transcription. Socket open resets/seeds the session, socket close
//! releases every per-connection resource.

use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use frontdesk_agent::DeskAgent;
use frontdesk_vision::EmotionWindow;

use crate::session::Session;
use crate::state::AppState;

/// Inbound client events.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Start the frame streaming loop.
    RequestFrame,
    /// One chat message (plain text).
    ChatMessage(String),
}

/// Outbound server events.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// One base64-encoded JPEG frame.
    Frame(String),
    /// Plain text chat reply.
    ChatResponse(String),
    /// Successful transcription.
    TranscriptionResult { transcription: String },
    /// Transcription failure.
    TranscriptionError { error: String },
}

impl ServerEvent {
    pub fn to_json(&self) -> String {
        // The enum shape cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Per-connection lifecycle: create + seed the session, dispatch events,
/// tear everything down on close.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let agent = DeskAgent::new(
        Arc::clone(&state.backend),
        Arc::clone(&state.stt),
        Arc::new(EmotionWindow::new(state.settings.vision.window_capacity)),
        state.session_config.clone(),
    );

    let session = match state.sessions.create(agent) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "refusing connection");
            return;
        }
    };

    tracing::info!(session_id = %session.id, "client connected");

    let (mut socket_tx, mut socket_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<ServerEvent>(32);

    let send_task = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            if socket_tx
                .send(WsMessage::Text(event.to_json()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    while let Some(message) = socket_rx.next().await {
        match message {
            Ok(WsMessage::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::RequestFrame) => {
                    session.start_stream(&state, out_tx.clone());
                }
                Ok(ClientEvent::ChatMessage(text)) => {
                    let session = Arc::clone(&session);
                    let out = out_tx.clone();
                    tokio::spawn(async move {
                        let event = handle_chat_event(&session, &text).await;
                        let _ = out.send(event).await;
                    });
                }
                Err(e) => {
                    tracing::warn!(session_id = %session.id, error = %e, "ignoring malformed event");
                }
            },
            Ok(WsMessage::Binary(audio)) => {
                let session = Arc::clone(&session);
                let out = out_tx.clone();
                tokio::spawn(async move {
                    let event = handle_audio_event(&session, &audio).await;
                    let _ = out.send(event).await;
                });
            }
            Ok(WsMessage::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    tracing::info!(session_id = %session.id, "client disconnected");
    state.sessions.remove(&session.id);
    send_task.abort();
}

/// Dispatch one chat message. Never fails outward: a generation failure is
/// already resolved to the fallback text inside the session.
pub(crate) async fn handle_chat_event(session: &Session, text: &str) -> ServerEvent {
    let reply = session.agent.handle_chat(text).await;
    ServerEvent::ChatResponse(reply)
}

/// Dispatch one audio clip. Failures become a distinct error payload; the
/// conversation log is never touched.
pub(crate) async fn handle_audio_event(session: &Session, audio: &[u8]) -> ServerEvent {
    match session.agent.handle_audio(audio).await {
        Ok(transcription) => ServerEvent::TranscriptionResult { transcription },
        Err(e) => {
            tracing::error!(session_id = %session.id, operation = "transcribe", error = %e, "transcription failed");
            ServerEvent::TranscriptionError {
                error: e.to_string(),
            }
        }
    }
}
