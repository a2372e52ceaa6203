use image::RgbImage;

use super::emotion_scores::EmotionScores;

/// Domain interface for classifying the emotion of a single face crop.
pub trait EmotionClassifier {
    fn classify(&mut self, face: &RgbImage) -> Result<EmotionScores, Box<dyn std::error::Error>>;
}
