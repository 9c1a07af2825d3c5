//! Frame annotation and encoding
//!
//! Draws detection overlays (bounding box + "label: confidence" caption) on a
//! mutable frame copy and JPEG-encodes the result for emission.

use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use frontdesk_core::Detection;

use crate::VisionError;

/// Annotation configuration
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    /// Bounding box color
    pub box_color: Rgb<u8>,
    /// Caption text color
    pub caption_color: Rgb<u8>,
    /// Caption glyph height in pixels
    pub caption_scale: f32,
    /// Box border thickness in pixels
    pub box_thickness: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            box_color: Rgb([0, 0, 255]),
            caption_color: Rgb([0, 255, 0]),
            caption_scale: 22.0,
            box_thickness: 2,
            jpeg_quality: 80,
        }
    }
}

/// Encode a frame as JPEG bytes.
pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Vec<u8>, VisionError> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode_image(frame)
        .map_err(|e| VisionError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Overlay drawing + encoding seam used by the streaming loop.
pub trait Annotate: Send + Sync + 'static {
    /// Draw detection overlays onto the frame.
    fn annotate(&self, frame: &mut RgbImage, detections: &[Detection]);

    /// Encode the annotated frame as JPEG bytes.
    fn encode_jpeg(&self, frame: &RgbImage) -> Result<Vec<u8>, VisionError>;
}

/// Draws overlays and encodes annotated frames.
pub struct FrameAnnotator {
    font: FontVec,
    config: AnnotatorConfig,
}

impl FrameAnnotator {
    /// Load the caption font from disk. A load failure is fatal at startup.
    pub fn new(font_path: &str, config: AnnotatorConfig) -> Result<Self, VisionError> {
        let bytes = std::fs::read(font_path)
            .map_err(|e| VisionError::Asset(format!("failed to read {}: {}", font_path, e)))?;
        Self::from_font_bytes(bytes, config)
    }

    pub fn from_font_bytes(bytes: Vec<u8>, config: AnnotatorConfig) -> Result<Self, VisionError> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| VisionError::Asset(format!("invalid caption font: {}", e)))?;
        Ok(Self { font, config })
    }

}

impl Annotate for FrameAnnotator {
    /// Draw every detection's box and caption onto the frame.
    ///
    /// Zero detections is a no-op, not an error.
    fn annotate(&self, frame: &mut RgbImage, detections: &[Detection]) {
        for detection in detections {
            let region = &detection.region;

            for inset in 0..self.config.box_thickness {
                let width = region.width.saturating_sub(inset * 2);
                let height = region.height.saturating_sub(inset * 2);
                if width < 2 || height < 2 {
                    break;
                }
                let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32)
                    .of_size(width, height);
                draw_hollow_rect_mut(frame, rect, self.config.box_color);
            }

            let caption = detection.caption();
            let caption_height = self.config.caption_scale as u32;
            // Above the top-left corner; clamps to the frame edge when there
            // is no room.
            let caption_y = region.y.saturating_sub(caption_height + 4);
            draw_text_mut(
                frame,
                self.config.caption_color,
                region.x as i32,
                caption_y as i32,
                PxScale::from(self.config.caption_scale),
                &self.font,
                &caption,
            );
        }
    }

    fn encode_jpeg(&self, frame: &RgbImage) -> Result<Vec<u8>, VisionError> {
        encode_jpeg(frame, self.config.jpeg_quality)
    }
}
