//! Frame annotation & streaming loop
//!
//! The long-lived per-request loop: acquire a frame, run inference, feed the
//! emotion window, draw overlays, encode, emit. Runs on a blocking worker
//! (`tokio::task::spawn_blocking`); the caller owns the receiving end of the
//! channel and the stop signal.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use frontdesk_core::{EmotionSensing, FrameSource};

use crate::annotate::Annotate;
use crate::EmotionWindow;

/// How a streaming loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The capture source ran out of frames. Normal termination.
    Exhausted,
    /// The receiver went away or the stop signal fired.
    Cancelled,
    /// Frame acquisition failed unexpectedly.
    CaptureFailed,
}

/// Run the streaming loop until the source exhausts or the request is
/// cancelled.
///
/// The capture source is owned by the loop and dropped (released) on every
/// exit path. A failed encode skips that frame and continues; frames with
/// zero detections are still emitted.
pub fn run_stream_loop(
    mut source: Box<dyn FrameSource>,
    sensor: Arc<dyn EmotionSensing>,
    window: Arc<EmotionWindow>,
    annotator: Arc<dyn Annotate>,
    tx: mpsc::Sender<Vec<u8>>,
    stop: watch::Receiver<bool>,
) -> StreamOutcome {
    let mut emitted = 0u64;

    let outcome = loop {
        if *stop.borrow() {
            break StreamOutcome::Cancelled;
        }

        let mut frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break StreamOutcome::Exhausted,
            Err(e) => {
                tracing::error!(operation = "frame_capture", error = %e, "capture failed, ending stream");
                break StreamOutcome::CaptureFailed;
            }
        };

        let detections = sensor.detect_emotions(&frame);
        for detection in &detections {
            window.observe(detection.emotion);
        }

        annotator.annotate(&mut frame, &detections);

        let bytes = match annotator.encode_jpeg(&frame) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(operation = "frame_encode", error = %e, "skipping frame");
                continue;
            }
        };

        if tx.blocking_send(bytes).is_err() {
            break StreamOutcome::Cancelled;
        }
        emitted += 1;
    };

    // The capture resource is released exactly once, before the frame
    // channel closes.
    drop(source);

    tracing::debug!(?outcome, emitted, "streaming loop finished");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::encode_jpeg;
    use crate::source::StaticFrameSource;
    use crate::VisionError;
    use frontdesk_core::{Detection, Emotion, FaceRegion};
    use image::RgbImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Box-only annotator: the caption font is a startup asset, so loop tests
    /// draw nothing and just encode.
    struct PlainAnnotator {
        fail_encodes: usize,
        encodes: AtomicUsize,
    }

    impl PlainAnnotator {
        fn new() -> Self {
            Self {
                fail_encodes: 0,
                encodes: AtomicUsize::new(0),
            }
        }

        fn failing_first(fail_encodes: usize) -> Self {
            Self {
                fail_encodes,
                encodes: AtomicUsize::new(0),
            }
        }
    }

    impl Annotate for PlainAnnotator {
        fn annotate(&self, _frame: &mut RgbImage, _detections: &[Detection]) {}

        fn encode_jpeg(&self, frame: &RgbImage) -> Result<Vec<u8>, VisionError> {
            let call = self.encodes.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_encodes {
                return Err(VisionError::Encode("forced".to_string()));
            }
            encode_jpeg(frame, 80)
        }
    }

    struct CountingSensor {
        calls: Arc<AtomicUsize>,
        emotion: Emotion,
    }

    impl EmotionSensing for CountingSensor {
        fn detect_emotions(&self, _frame: &RgbImage) -> Vec<Detection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![Detection {
                region: FaceRegion::new(1, 1, 4, 4),
                emotion: self.emotion,
                confidence: 0.8,
            }]
        }
    }

    struct NullSensor;

    impl EmotionSensing for NullSensor {
        fn detect_emotions(&self, _frame: &RgbImage) -> Vec<Detection> {
            Vec::new()
        }
    }

    /// Tracks drop of the underlying source to assert release-on-exit.
    struct DropTrackingSource {
        inner: StaticFrameSource,
        released: Arc<AtomicUsize>,
    }

    impl FrameSource for DropTrackingSource {
        fn next_frame(&mut self) -> frontdesk_core::Result<Option<RgbImage>> {
            self.inner.next_frame()
        }
    }

    impl Drop for DropTrackingSource {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_loop_exhausts_and_releases_source_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let source = DropTrackingSource {
            inner: StaticFrameSource::new(vec![RgbImage::new(8, 8), RgbImage::new(8, 8)]),
            released: Arc::clone(&released),
        };

        let calls = Arc::new(AtomicUsize::new(0));
        let sensor = Arc::new(CountingSensor {
            calls: Arc::clone(&calls),
            emotion: Emotion::Happy,
        });
        let window = Arc::new(EmotionWindow::new(20));
        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::task::spawn_blocking({
            let window = Arc::clone(&window);
            move || {
                run_stream_loop(
                    Box::new(source),
                    sensor,
                    window,
                    Arc::new(PlainAnnotator::new()),
                    tx,
                    stop_rx,
                )
            }
        });

        let mut frames = Vec::new();
        while let Some(bytes) = rx.recv().await {
            frames.push(bytes);
        }

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, StreamOutcome::Exhausted);
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.starts_with(&[0xFF, 0xD8])));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        // Observations landed in capture order.
        assert_eq!(window.len(), 2);
        assert_eq!(window.dominant(), Emotion::Happy);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_frames_without_detections_are_still_emitted() {
        let source = StaticFrameSource::new(vec![RgbImage::new(8, 8)]);
        let window = Arc::new(EmotionWindow::new(20));
        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::task::spawn_blocking({
            let window = Arc::clone(&window);
            move || {
                run_stream_loop(
                    Box::new(source),
                    Arc::new(NullSensor),
                    window,
                    Arc::new(PlainAnnotator::new()),
                    tx,
                    stop_rx,
                )
            }
        });

        assert!(rx.recv().await.is_some());
        assert_eq!(handle.await.unwrap(), StreamOutcome::Exhausted);
        assert!(window.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_encode_skips_frame_and_continues() {
        let source = StaticFrameSource::new(vec![RgbImage::new(8, 8); 3]);
        let window = Arc::new(EmotionWindow::new(20));
        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::task::spawn_blocking(move || {
            run_stream_loop(
                Box::new(source),
                Arc::new(NullSensor),
                window,
                Arc::new(PlainAnnotator::failing_first(1)),
                tx,
                stop_rx,
            )
        });

        let mut frames = Vec::new();
        while let Some(bytes) = rx.recv().await {
            frames.push(bytes);
        }

        // First encode fails and is skipped; the remaining two are emitted.
        assert_eq!(handle.await.unwrap(), StreamOutcome::Exhausted);
        assert_eq!(frames.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dropped_receiver_cancels_loop() {
        // More frames than channel capacity, and no reader.
        let source = StaticFrameSource::new(vec![RgbImage::new(8, 8); 16]);
        let window = Arc::new(EmotionWindow::new(20));
        let (tx, rx) = mpsc::channel(1);
        let (_stop_tx, stop_rx) = watch::channel(false);
        drop(rx);

        let handle = tokio::task::spawn_blocking(move || {
            run_stream_loop(
                Box::new(source),
                Arc::new(NullSensor),
                window,
                Arc::new(PlainAnnotator::new()),
                tx,
                stop_rx,
            )
        });

        assert_eq!(handle.await.unwrap(), StreamOutcome::Cancelled);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stop_signal_cancels_loop() {
        let source = StaticFrameSource::new(vec![RgbImage::new(8, 8); 16]);
        let window = Arc::new(EmotionWindow::new(20));
        let (tx, _rx) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(true);

        let handle = tokio::task::spawn_blocking(move || {
            run_stream_loop(
                Box::new(source),
                Arc::new(NullSensor),
                window,
                Arc::new(PlainAnnotator::new()),
                tx,
                stop_rx,
            )
        });

        assert_eq!(handle.await.unwrap(), StreamOutcome::Cancelled);
        drop(stop_tx);
    }
}
