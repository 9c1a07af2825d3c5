//! Adapter traits for pluggable backends

pub mod llm;
pub mod speech;
pub mod vision;

pub use llm::ChatBackend;
pub use speech::SpeechToText;
pub use vision::{EmotionClassifier, EmotionSensing, FaceDetector, FrameSource};
