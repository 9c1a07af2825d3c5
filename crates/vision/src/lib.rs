//! Vision pipeline: face detection, emotion classification, aggregation,
//! annotation, and the frame streaming loop
//!
//! Model sessions are loaded once during startup and shared behind the core
//! adapter traits; per-frame inference failures are contained to the frame
//! they occurred on.

pub mod annotate;
pub mod classifier;
pub mod detector;
pub mod sensor;
pub mod source;
pub mod stream;
pub mod window;

pub use annotate::{encode_jpeg, Annotate, AnnotatorConfig, FrameAnnotator};
pub use classifier::{ClassifierConfig, OnnxEmotionClassifier};
pub use detector::{DetectorConfig, YoloFaceDetector};
pub use sensor::EmotionSensor;
pub use source::{ImageDirSource, StaticFrameSource};
pub use stream::{run_stream_loop, StreamOutcome};
pub use window::EmotionWindow;

use thiserror::Error;

/// Vision errors
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Capture error: {0}")]
    Capture(String),
}

impl From<VisionError> for frontdesk_core::Error {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Model(msg) => frontdesk_core::Error::ModelUnavailable(msg),
            VisionError::Asset(msg) => frontdesk_core::Error::ModelUnavailable(msg),
            VisionError::Inference(msg) => frontdesk_core::Error::Inference(msg),
            VisionError::Encode(msg) => frontdesk_core::Error::Inference(msg),
            VisionError::Capture(msg) => frontdesk_core::Error::Capture(msg),
        }
    }
}
