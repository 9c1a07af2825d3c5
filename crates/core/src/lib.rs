//! Core traits and types for the front desk agent
//!
//! This crate provides foundational types used across all other crates:
//! - Adapter traits for pluggable backends (face detection, emotion
//!   classification, STT, chat completion, frame acquisition)
//! - Emotion labels and per-frame detection types
//! - Chat message types
//! - Error types

pub mod chat;
pub mod detection;
pub mod emotion;
pub mod error;
pub mod traits;

pub use chat::{Message, Role};
pub use detection::{Detection, FaceRegion};
pub use emotion::{Emotion, CLASSIFIER_LABELS};
pub use error::{Error, Result};

pub use traits::{
    // LLM
    ChatBackend,
    // Vision
    EmotionClassifier, EmotionSensing, FaceDetector, FrameSource,
    // Speech
    SpeechToText,
};
