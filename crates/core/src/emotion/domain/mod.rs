pub mod emotion_analyzer;
pub mod emotion_classifier;
pub mod emotion_label;
pub mod emotion_scores;
pub mod face_analysis;
pub mod face_locator;
