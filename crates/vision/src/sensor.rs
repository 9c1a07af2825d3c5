//! Combined face -> emotion sensing
//!
//! Composes a face detector and an emotion classifier behind one
//! frame-to-detections call. Per-frame inference failures are logged and
//! contained: a detector failure yields zero detections, a classifier failure
//! skips that crop.

use std::sync::Arc;

use image::{imageops, RgbImage};

use frontdesk_core::{Detection, EmotionClassifier, EmotionSensing, FaceDetector};

/// Face detection + emotion classification adapter.
pub struct EmotionSensor {
    detector: Arc<dyn FaceDetector>,
    classifier: Arc<dyn EmotionClassifier>,
}

impl EmotionSensor {
    pub fn new(detector: Arc<dyn FaceDetector>, classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self { detector, classifier }
    }
}

impl EmotionSensing for EmotionSensor {
    fn detect_emotions(&self, frame: &RgbImage) -> Vec<Detection> {
        let regions = match self.detector.detect(frame) {
            Ok(regions) => regions,
            Err(e) => {
                tracing::warn!(operation = "face_detection", error = %e, "inference failed, treating frame as empty");
                return Vec::new();
            }
        };

        let (width, height) = frame.dimensions();
        let mut detections = Vec::with_capacity(regions.len());

        for region in regions {
            let Some(region) = region.clamped(width, height) else {
                continue;
            };

            let crop = imageops::crop_imm(frame, region.x, region.y, region.width, region.height)
                .to_image();

            match self.classifier.classify(&crop) {
                Ok((emotion, confidence)) => {
                    detections.push(Detection { region, emotion, confidence });
                }
                Err(e) => {
                    tracing::warn!(operation = "emotion_classification", error = %e, "inference failed, skipping crop");
                }
            }
        }

        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_core::{Emotion, Error, FaceRegion, Result};

    struct FixedDetector(Vec<FaceRegion>);

    impl FaceDetector for FixedDetector {
        fn detect(&self, _frame: &RgbImage) -> Result<Vec<FaceRegion>> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed-detector"
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&self, _frame: &RgbImage) -> Result<Vec<FaceRegion>> {
            Err(Error::Inference("boom".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing-detector"
        }
    }

    struct FixedClassifier;

    impl EmotionClassifier for FixedClassifier {
        fn classify(&self, _face: &RgbImage) -> Result<(Emotion, f32)> {
            Ok((Emotion::Happy, 0.9))
        }

        fn model_name(&self) -> &str {
            "fixed-classifier"
        }
    }

    #[test]
    fn test_no_faces_yields_no_detections() {
        let sensor = EmotionSensor::new(
            Arc::new(FixedDetector(Vec::new())),
            Arc::new(FixedClassifier),
        );
        let frame = RgbImage::new(64, 64);
        assert!(sensor.detect_emotions(&frame).is_empty());
    }

    #[test]
    fn test_detector_failure_yields_empty_not_panic() {
        let sensor = EmotionSensor::new(Arc::new(FailingDetector), Arc::new(FixedClassifier));
        let frame = RgbImage::new(64, 64);
        assert!(sensor.detect_emotions(&frame).is_empty());
    }

    #[test]
    fn test_each_face_is_classified() {
        let regions = vec![
            FaceRegion::new(0, 0, 16, 16),
            FaceRegion::new(32, 32, 16, 16),
        ];
        let sensor = EmotionSensor::new(
            Arc::new(FixedDetector(regions)),
            Arc::new(FixedClassifier),
        );
        let frame = RgbImage::new(64, 64);
        let detections = sensor.detect_emotions(&frame);
        assert_eq!(detections.len(), 2);
        assert!(detections.iter().all(|d| d.emotion == Emotion::Happy));
    }

    #[test]
    fn test_out_of_bounds_region_is_skipped() {
        let regions = vec![FaceRegion::new(200, 200, 16, 16)];
        let sensor = EmotionSensor::new(
            Arc::new(FixedDetector(regions)),
            Arc::new(FixedClassifier),
        );
        let frame = RgbImage::new(64, 64);
        assert!(sensor.detect_emotions(&frame).is_empty());
    }
}
