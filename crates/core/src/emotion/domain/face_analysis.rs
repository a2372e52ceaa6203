use std::fmt;

use crate::shared::region::Region;

use super::emotion_scores::EmotionScores;

/// Raw per-face output of an [`EmotionAnalyzer`](super::emotion_analyzer::EmotionAnalyzer).
///
/// Every field is optional: analyzers may return partial records, and the
/// overlay decides what to do with them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisRecord {
    pub region: Option<Region>,
    pub dominant_emotion: Option<String>,
    pub emotion: Option<EmotionScores>,
}

impl AnalysisRecord {
    /// A complete record whose dominant label is derived from `scores`.
    pub fn from_scores(region: Region, scores: EmotionScores) -> Self {
        let dominant_emotion = scores.dominant().map(|(label, _)| label.to_string());
        Self {
            region: Some(region),
            dominant_emotion,
            emotion: Some(scores),
        }
    }

    /// Validates that region, dominant label and scores are all present.
    pub fn into_detection(self) -> Result<Detection, MissingField> {
        let region = self.region.ok_or(MissingField::Region)?;
        let dominant_emotion = self.dominant_emotion.ok_or(MissingField::DominantEmotion)?;
        let scores = self.emotion.ok_or(MissingField::Emotion)?;
        Ok(Detection {
            region,
            dominant_emotion,
            scores,
        })
    }
}

/// Field absent from an [`AnalysisRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingField {
    Region,
    DominantEmotion,
    Emotion,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingField::Region => "region",
            MissingField::DominantEmotion => "dominant_emotion",
            MissingField::Emotion => "emotion",
        };
        f.write_str(name)
    }
}

/// A face with everything needed to annotate it.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub region: Region,
    pub dominant_emotion: String,
    pub scores: EmotionScores,
}

impl Detection {
    /// Confidence of the dominant label, 0.0 when the scores omit it.
    pub fn dominant_score(&self) -> f64 {
        self.scores.score(&self.dominant_emotion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scores() -> EmotionScores {
        [("happy", 0.8), ("sad", 0.1)].into_iter().collect()
    }

    #[test]
    fn test_from_scores_sets_dominant() {
        let record = AnalysisRecord::from_scores(Region::new(1, 2, 3, 4), scores());
        assert_eq!(record.dominant_emotion.as_deref(), Some("happy"));
    }

    #[test]
    fn test_complete_record_validates() {
        let record = AnalysisRecord::from_scores(Region::new(1, 2, 3, 4), scores());
        let detection = record.into_detection().unwrap();
        assert_eq!(detection.region, Region::new(1, 2, 3, 4));
        assert_relative_eq!(detection.dominant_score(), 0.8);
    }

    #[test]
    fn test_missing_region() {
        let record = AnalysisRecord {
            region: None,
            ..AnalysisRecord::from_scores(Region::new(0, 0, 1, 1), scores())
        };
        assert_eq!(record.into_detection().unwrap_err(), MissingField::Region);
    }

    #[test]
    fn test_missing_dominant() {
        let record = AnalysisRecord {
            dominant_emotion: None,
            ..AnalysisRecord::from_scores(Region::new(0, 0, 1, 1), scores())
        };
        assert_eq!(
            record.into_detection().unwrap_err(),
            MissingField::DominantEmotion
        );
    }

    #[test]
    fn test_missing_scores() {
        let record = AnalysisRecord {
            region: Some(Region::new(0, 0, 1, 1)),
            dominant_emotion: Some("happy".into()),
            emotion: None,
        };
        assert_eq!(record.into_detection().unwrap_err(), MissingField::Emotion);
        assert_eq!(MissingField::Emotion.to_string(), "emotion");
    }

    #[test]
    fn test_dominant_not_in_scores_defaults_to_zero() {
        let detection = Detection {
            region: Region::new(0, 0, 10, 10),
            dominant_emotion: "fear".into(),
            scores: scores(),
        };
        assert_relative_eq!(detection.dominant_score(), 0.0);
    }
}
