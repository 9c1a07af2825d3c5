//! Emotion labels
//!
//! The classifier predicts one of six labels; `Neutral` is the sentinel used
//! when no recent observation exists and is never produced by the model.

use serde::{Deserialize, Serialize};

/// A facial emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    /// Default when the aggregation window is empty.
    #[default]
    Neutral,
}

/// Classifier output labels in model index order.
pub const CLASSIFIER_LABELS: [Emotion; 6] = [
    Emotion::Anger,
    Emotion::Disgust,
    Emotion::Fear,
    Emotion::Happy,
    Emotion::Sad,
    Emotion::Surprise,
];

impl Emotion {
    /// Map a classifier arg-max index to its label.
    pub fn from_class_index(index: usize) -> Option<Self> {
        CLASSIFIER_LABELS.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    /// Labels the attendant should treat as a negative experience.
    pub fn is_negative(&self) -> bool {
        matches!(self, Emotion::Anger | Emotion::Disgust | Emotion::Sad | Emotion::Fear)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_mapping() {
        assert_eq!(Emotion::from_class_index(0), Some(Emotion::Anger));
        assert_eq!(Emotion::from_class_index(3), Some(Emotion::Happy));
        assert_eq!(Emotion::from_class_index(5), Some(Emotion::Surprise));
        assert_eq!(Emotion::from_class_index(6), None);
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Emotion::Happy.to_string(), "happy");
        assert_eq!(Emotion::Neutral.to_string(), "neutral");
    }

    #[test]
    fn test_neutral_is_default() {
        assert_eq!(Emotion::default(), Emotion::Neutral);
    }
}
