//! Conversation session and per-connection interaction agent
//!
//! `ChatSession` owns the ordered message log and the call contract to the
//! chat backend; `DeskAgent` composes it with the emotion window and the
//! transcription adapter for one client connection.

pub mod desk;
pub mod session;

pub use desk::{augment_user_text, DeskAgent};
pub use session::{ChatSession, SessionConfig, SessionState};
