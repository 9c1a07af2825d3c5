//! ONNX face detector
//!
//! YOLO-family single-class face model: letterboxed square input, candidate
//! boxes decoded from a `[1, 5, N]` output (cx, cy, w, h, score), filtered by
//! score and non-maximum suppression, then mapped back to source pixels.

use image::{imageops, RgbImage};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};

use frontdesk_config::VisionSettings;
use frontdesk_core::{FaceDetector, FaceRegion, Result};

use crate::VisionError;

/// Detector configuration
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the ONNX model
    pub model_path: String,
    /// Square input size
    pub input_size: u32,
    /// Minimum detection score
    pub score_threshold: f32,
    /// IoU threshold for non-maximum suppression
    pub iou_threshold: f32,
    /// Graph input tensor name
    pub input_name: String,
    /// Graph output tensor name
    pub output_name: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: "models/face-detector.onnx".to_string(),
            input_size: 640,
            score_threshold: 0.5,
            iou_threshold: 0.45,
            input_name: "images".to_string(),
            output_name: "output0".to_string(),
        }
    }
}

impl From<&VisionSettings> for DetectorConfig {
    fn from(settings: &VisionSettings) -> Self {
        Self {
            model_path: settings.detector_model.clone(),
            input_size: settings.detector_input,
            score_threshold: settings.score_threshold,
            iou_threshold: settings.iou_threshold,
            ..Default::default()
        }
    }
}

/// Letterbox mapping from source frame to model input.
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

/// YOLO-family ONNX face detector
pub struct YoloFaceDetector {
    session: Session,
    config: DetectorConfig,
}

impl YoloFaceDetector {
    /// Load the model. A load failure is fatal at startup.
    pub fn new(config: DetectorConfig) -> std::result::Result<Self, VisionError> {
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

        tracing::info!(model = %config.model_path, input = config.input_size, "face detector loaded");

        Ok(Self { session, config })
    }

    /// Resize into a gray letterbox canvas and build the input tensor.
    fn preprocess(&self, frame: &RgbImage) -> (Array4<f32>, Letterbox) {
        let size = self.config.input_size;
        let (width, height) = frame.dimensions();

        let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
        let new_width = ((width as f32 * scale) as u32).max(1);
        let new_height = ((height as f32 * scale) as u32).max(1);
        let pad_x = (size - new_width) as f32 / 2.0;
        let pad_y = (size - new_height) as f32 / 2.0;

        let resized = imageops::resize(frame, new_width, new_height, imageops::FilterType::Triangle);
        let mut canvas = RgbImage::from_pixel(size, size, image::Rgb([114, 114, 114]));
        imageops::overlay(&mut canvas, &resized, pad_x as i64, pad_y as i64);

        let mut input = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            for c in 0..3 {
                input[[0, c, y as usize, x as usize]] = pixel.0[c] as f32 / 255.0;
            }
        }

        (input, Letterbox { scale, pad_x, pad_y })
    }

    /// Decode candidate boxes back to source pixel coordinates.
    fn decode(
        &self,
        output: &ndarray::ArrayViewD<'_, f32>,
        letterbox: &Letterbox,
        frame_width: u32,
        frame_height: u32,
    ) -> Vec<(FaceRegion, f32)> {
        let shape = output.shape();
        if shape.len() != 3 || shape[1] < 5 {
            tracing::warn!(?shape, "unexpected detector output shape");
            return Vec::new();
        }

        let candidates = shape[2];
        let mut boxes = Vec::new();

        for i in 0..candidates {
            let score = output[[0, 4, i]];
            if score < self.config.score_threshold {
                continue;
            }

            let cx = (output[[0, 0, i]] - letterbox.pad_x) / letterbox.scale;
            let cy = (output[[0, 1, i]] - letterbox.pad_y) / letterbox.scale;
            let w = output[[0, 2, i]] / letterbox.scale;
            let h = output[[0, 3, i]] / letterbox.scale;

            let x1 = (cx - w / 2.0).max(0.0);
            let y1 = (cy - h / 2.0).max(0.0);
            let region = FaceRegion::new(x1 as u32, y1 as u32, w.max(1.0) as u32, h.max(1.0) as u32);

            if let Some(region) = region.clamped(frame_width, frame_height) {
                boxes.push((region, score));
            }
        }

        non_max_suppression(boxes, self.config.iou_threshold)
    }
}

/// Greedy NMS over score-sorted candidates.
fn non_max_suppression(
    mut boxes: Vec<(FaceRegion, f32)>,
    iou_threshold: f32,
) -> Vec<(FaceRegion, f32)> {
    boxes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut kept: Vec<(FaceRegion, f32)> = Vec::new();
    for (region, score) in boxes {
        if kept.iter().all(|(k, _)| k.iou(&region) < iou_threshold) {
            kept.push((region, score));
        }
    }
    kept
}

impl FaceDetector for YoloFaceDetector {
    fn detect(&self, frame: &RgbImage) -> Result<Vec<FaceRegion>> {
        let (width, height) = frame.dimensions();
        let (input, letterbox) = self.preprocess(frame);

        let outputs = self
            .session
            .run(
                ort::inputs![self.config.input_name.as_str() => input.view()]
                    .map_err(|e| VisionError::Inference(e.to_string()))?,
            )
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let output = outputs
            .get(self.config.output_name.as_str())
            .ok_or_else(|| {
                VisionError::Inference(format!("missing {} output", self.config.output_name))
            })?
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let regions = self
            .decode(&output.view(), &letterbox, width, height)
            .into_iter()
            .map(|(region, _)| region)
            .collect();

        Ok(regions)
    }

    fn model_name(&self) -> &str {
        &self.config.model_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nms_suppresses_overlaps() {
        let boxes = vec![
            (FaceRegion::new(10, 10, 100, 100), 0.9),
            (FaceRegion::new(12, 12, 100, 100), 0.8),
            (FaceRegion::new(300, 300, 50, 50), 0.7),
        ];
        let kept = non_max_suppression(boxes, 0.45);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].0, FaceRegion::new(10, 10, 100, 100));
        assert_eq!(kept[1].0, FaceRegion::new(300, 300, 50, 50));
    }

    #[test]
    fn test_nms_keeps_highest_score_first() {
        let boxes = vec![
            (FaceRegion::new(0, 0, 10, 10), 0.5),
            (FaceRegion::new(1, 1, 10, 10), 0.95),
        ];
        let kept = non_max_suppression(boxes, 0.45);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].1 - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let result = YoloFaceDetector::new(DetectorConfig {
            model_path: "/nonexistent/face.onnx".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(VisionError::Model(_))));
    }
}
