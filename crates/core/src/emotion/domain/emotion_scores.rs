use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Per-label confidence scores for one face.
///
/// Scores are in [0, 1] but need not sum to 1. Labels outside
/// [`EmotionLabel`](super::emotion_label::EmotionLabel) are kept so an analyzer can report extra classes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmotionScores {
    scores: BTreeMap<String, f64>,
}

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        self.scores.insert(label.into(), score);
    }

    /// Score for `label`, or 0.0 when the analyzer did not report it.
    pub fn score(&self, label: &str) -> f64 {
        self.scores.get(label).copied().unwrap_or(0.0)
    }

    /// Label with the highest score. Ties resolve to the first label in key order.
    pub fn dominant(&self) -> Option<(&str, f64)> {
        // `max_by` keeps the last maximum, so walk in reverse to keep the first.
        self.scores
            .iter()
            .rev()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
            .map(|(label, &score)| (label.as_str(), score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (label, score) in iter {
            scores.insert(label, score);
        }
        scores
    }
}
