//! Frame sources
//!
//! Capture hardware is an external collaborator; these adapters present it as
//! a pull-based sequence that ends with `Ok(None)`.

use std::path::PathBuf;

use image::RgbImage;

use frontdesk_core::{FrameSource, Result};

use crate::VisionError;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Serves image files from a directory in sorted order.
///
/// The development stand-in for a camera: point it at a directory of frames
/// and it replays them, optionally in a loop.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    index: usize,
    loop_frames: bool,
}

impl ImageDirSource {
    pub fn open(dir: &str, loop_frames: bool) -> std::result::Result<Self, VisionError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| VisionError::Capture(format!("failed to open {}: {}", dir, e)))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            tracing::warn!(dir = %dir, "capture directory contains no frames");
        }

        Ok(Self {
            paths,
            index: 0,
            loop_frames,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        loop {
            if self.index >= self.paths.len() {
                if self.loop_frames && !self.paths.is_empty() {
                    self.index = 0;
                } else {
                    return Ok(None);
                }
            }

            let path = &self.paths[self.index];
            self.index += 1;

            match image::open(path) {
                Ok(img) => return Ok(Some(img.to_rgb8())),
                Err(e) => {
                    // A single unreadable file is skipped, not fatal.
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable frame");
                }
            }
        }
    }
}

/// Yields a fixed set of in-memory frames once, then exhausts.
pub struct StaticFrameSource {
    frames: std::vec::IntoIter<RgbImage>,
}

impl StaticFrameSource {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for StaticFrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.frames.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_exhausts() {
        let mut source = StaticFrameSource::new(vec![RgbImage::new(2, 2), RgbImage::new(2, 2)]);
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
        // Stays exhausted.
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_capture_error() {
        assert!(ImageDirSource::open("/nonexistent/frames", false).is_err());
    }

    #[test]
    fn test_empty_directory_exhausts_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageDirSource::open(dir.path().to_str().unwrap(), false).unwrap();
        assert_eq!(source.frame_count(), 0);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_reads_frames_in_sorted_order_and_loops() {
        let dir = tempfile::tempdir().unwrap();
        for (name, shade) in [("b.png", 20u8), ("a.png", 10u8)] {
            let img = RgbImage::from_pixel(2, 2, image::Rgb([shade, shade, shade]));
            img.save(dir.path().join(name)).unwrap();
        }

        let mut source = ImageDirSource::open(dir.path().to_str().unwrap(), true).unwrap();
        assert_eq!(source.frame_count(), 2);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.get_pixel(0, 0).0[0], 10);
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.get_pixel(0, 0).0[0], 20);
        // loop_frames wraps around instead of exhausting.
        let third = source.next_frame().unwrap().unwrap();
        assert_eq!(third.get_pixel(0, 0).0[0], 10);
    }
}
