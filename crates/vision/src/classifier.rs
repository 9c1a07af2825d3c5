//! ONNX emotion classifier
//!
//! Face crops are resized to the model's square input and normalized with
//! fixed per-channel statistics; the output logits are softmaxed and the
//! arg-max label returned with its probability.

use image::{imageops, RgbImage};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};

use frontdesk_config::VisionSettings;
use frontdesk_core::{Emotion, EmotionClassifier, Result, CLASSIFIER_LABELS};

use crate::VisionError;

/// Per-channel normalization statistics.
const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Classifier configuration
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Path to the ONNX model
    pub model_path: String,
    /// Square input size
    pub input_size: u32,
    /// Graph input tensor name
    pub input_name: String,
    /// Graph output tensor name
    pub output_name: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: "models/emotion-recognition.onnx".to_string(),
            input_size: 224,
            input_name: "input".to_string(),
            output_name: "logits".to_string(),
        }
    }
}

impl From<&VisionSettings> for ClassifierConfig {
    fn from(settings: &VisionSettings) -> Self {
        Self {
            model_path: settings.classifier_model.clone(),
            input_size: settings.classifier_input,
            ..Default::default()
        }
    }
}

/// ONNX emotion classifier
pub struct OnnxEmotionClassifier {
    session: Session,
    config: ClassifierConfig,
}

impl OnnxEmotionClassifier {
    /// Load the model. A load failure is fatal at startup.
    pub fn new(config: ClassifierConfig) -> std::result::Result<Self, VisionError> {
        let session = Session::builder()
            .map_err(|e| VisionError::Model(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| VisionError::Model(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| VisionError::Model(e.to_string()))?
            .commit_from_file(&config.model_path)
            .map_err(|e| {
                VisionError::Model(format!("failed to load {}: {}", config.model_path, e))
            })?;

        tracing::info!(model = %config.model_path, input = config.input_size, "emotion classifier loaded");

        Ok(Self { session, config })
    }

    /// Resize and normalize a face crop into the input tensor.
    fn preprocess(&self, face: &RgbImage) -> Array4<f32> {
        let size = self.config.input_size;
        let resized = imageops::resize(face, size, size, imageops::FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                let value = pixel.0[c] as f32 / 255.0;
                input[[0, c, y as usize, x as usize]] = (value - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
            }
        }
        input
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&self, face: &RgbImage) -> Result<(Emotion, f32)> {
        let input = self.preprocess(face);

        let outputs = self
            .session
            .run(
                ort::inputs![self.config.input_name.as_str() => input.view()]
                    .map_err(|e| VisionError::Inference(e.to_string()))?,
            )
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let logits = outputs
            .get(self.config.output_name.as_str())
            .ok_or_else(|| {
                VisionError::Inference(format!("missing {} output", self.config.output_name))
            })?
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let (emotion, confidence) = softmax_argmax(logits.view().iter().copied())
            .ok_or_else(|| VisionError::Inference("empty logits".to_string()))?;

        Ok((emotion, confidence))
    }

    fn model_name(&self) -> &str {
        &self.config.model_path
    }
}

/// Softmax over the logits, returning the arg-max label and its probability.
fn softmax_argmax(logits: impl Iterator<Item = f32>) -> Option<(Emotion, f32)> {
    let logits: Vec<f32> = logits.take(CLASSIFIER_LABELS.len()).collect();
    if logits.is_empty() {
        return None;
    }

    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();

    let (index, _) = logits
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

    let emotion = Emotion::from_class_index(index)?;
    Some((emotion, exp[index] / sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_argmax_picks_largest_logit() {
        // Index 3 is "happy" in model order.
        let (emotion, confidence) =
            softmax_argmax([0.1, 0.0, -1.0, 4.0, 0.5, 0.2].into_iter()).unwrap();
        assert_eq!(emotion, Emotion::Happy);
        assert!(confidence > 0.9);
    }

    #[test]
    fn test_softmax_confidence_is_normalized() {
        let (_, confidence) = softmax_argmax([1.0, 1.0, 1.0, 1.0, 1.0, 1.0].into_iter()).unwrap();
        assert!((confidence - 1.0 / 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_logits_is_none() {
        assert!(softmax_argmax(std::iter::empty()).is_none());
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let result = OnnxEmotionClassifier::new(ClassifierConfig {
            model_path: "/nonexistent/emotion.onnx".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(VisionError::Model(_))));
    }
}
