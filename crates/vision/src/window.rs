//! Emotion aggregation window
//!
//! A bounded ring of the most recent per-frame emotion labels. The streaming
//! loop writes, the chat path reads; both go through short internal locks so
//! no guard is ever held across a blocking call.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use frontdesk_core::Emotion;

/// Sliding window of recent emotion observations.
pub struct EmotionWindow {
    samples: Mutex<VecDeque<Emotion>>,
    capacity: usize,
}

impl EmotionWindow {
    /// Create a window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record one observation, evicting the oldest at capacity.
    pub fn observe(&self, emotion: Emotion) {
        let mut samples = self.samples.lock();
        if samples.len() == self.capacity {
            samples.pop_front();
        }
        samples.push_back(emotion);
    }

    /// The most frequent label currently in the window.
    ///
    /// Tie-break: counting samples in arrival order, the first label to reach
    /// the maximal running count wins. `Neutral` when the window is empty.
    pub fn dominant(&self) -> Emotion {
        let samples = self.samples.lock();

        let mut counts: HashMap<Emotion, usize> = HashMap::new();
        let mut best = None;
        let mut best_count = 0;

        for &sample in samples.iter() {
            let count = counts.entry(sample).or_insert(0);
            *count += 1;
            if *count > best_count {
                best_count = *count;
                best = Some(sample);
            }
        }

        best.unwrap_or(Emotion::Neutral)
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
