//! Per-frame detection types
//!
//! Detections are ephemeral: they exist for one inference pass and are
//! discarded once the frame has been annotated and encoded.

use serde::{Deserialize, Serialize};

use crate::Emotion;

/// An axis-aligned face bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Intersection-over-union with another region.
    pub fn iou(&self, other: &FaceRegion) -> f32 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        if ix2 <= ix1 || iy2 <= iy1 {
            return 0.0;
        }

        let inter = (ix2 - ix1) as u64 * (iy2 - iy1) as u64;
        let union = self.area() + other.area() - inter;
        inter as f32 / union as f32
    }

    /// Clamp the region to frame bounds, returning `None` when nothing is left.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Option<FaceRegion> {
        if self.x >= frame_width || self.y >= frame_height {
            return None;
        }
        let width = self.width.min(frame_width - self.x);
        let height = self.height.min(frame_height - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(FaceRegion { x: self.x, y: self.y, width, height })
    }
}

/// One classified face in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub region: FaceRegion,
    pub emotion: Emotion,
    /// Softmax confidence of the arg-max label, in [0, 1].
    pub confidence: f32,
}

impl Detection {
    /// Overlay caption text for this detection.
    pub fn caption(&self) -> String {
        format!("{}: {:.2}", self.emotion, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iou_disjoint() {
        let a = FaceRegion::new(0, 0, 10, 10);
        let b = FaceRegion::new(20, 20, 10, 10);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_identical() {
        let a = FaceRegion::new(5, 5, 10, 10);
        assert!((a.iou(&a) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamped_to_frame() {
        let region = FaceRegion::new(90, 90, 50, 50);
        let clamped = region.clamped(100, 100).unwrap();
        assert_eq!(clamped.width, 10);
        assert_eq!(clamped.height, 10);

        assert!(FaceRegion::new(120, 0, 10, 10).clamped(100, 100).is_none());
    }

    #[test]
    fn test_caption_format() {
        let det = Detection {
            region: FaceRegion::new(0, 0, 10, 10),
            emotion: Emotion::Happy,
            confidence: 0.934,
        };
        assert_eq!(det.caption(), "happy: 0.93");
    }
}
