//! Vision adapter traits
//!
//! Each model sits behind an explicit interface constructed once during
//! startup and passed by reference to the components that need it.

use image::RgbImage;

use crate::{Detection, Emotion, FaceRegion, Result};

/// Face localization interface.
///
/// Implementations:
/// - `YoloFaceDetector` - ONNX YOLO-family face model
pub trait FaceDetector: Send + Sync + 'static {
    /// Locate candidate face regions in a frame.
    ///
    /// Zero faces is an empty vec, not an error.
    fn detect(&self, frame: &RgbImage) -> Result<Vec<FaceRegion>>;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

/// Emotion classification interface.
///
/// Implementations:
/// - `OnnxEmotionClassifier` - 224x224 normalized-crop classifier
pub trait EmotionClassifier: Send + Sync + 'static {
    /// Classify a face crop, returning the arg-max label and its softmax
    /// confidence.
    fn classify(&self, face: &RgbImage) -> Result<(Emotion, f32)>;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

/// Combined frame -> detections interface used by the streaming loop.
pub trait EmotionSensing: Send + Sync + 'static {
    /// Run face localization then per-crop emotion classification.
    ///
    /// Must not mutate the input frame; drawing happens downstream on a copy.
    fn detect_emotions(&self, frame: &RgbImage) -> Vec<Detection>;
}

/// Frame acquisition interface.
///
/// Capture hardware is an external collaborator; implementations adapt it to
/// a pull model. `Ok(None)` signals normal exhaustion of the source.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}
