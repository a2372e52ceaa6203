use std::path::Path;

use crate::emotion::domain::emotion_analyzer::{DetectorBackend, EmotionAnalyzer};
use crate::emotion::domain::face_locator::FaceLocator;
use crate::shared::constants::{EMOTION_MODEL_NAME, EMOTION_MODEL_URL};
use crate::shared::model_resolver::{self, ModelSource, ProgressFn};

use super::face_emotion_analyzer::FaceEmotionAnalyzer;
use super::onnx_blazeface_locator::OnnxBlazefaceLocator;
use super::onnx_emotion_classifier::OnnxEmotionClassifier;
use super::onnx_yolo_locator::OnnxYoloLocator;

/// Default face detection confidence threshold.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

pub const EMOTION_MODEL: ModelSource<'static> = ModelSource {
    name: EMOTION_MODEL_NAME,
    url: Some(EMOTION_MODEL_URL),
};

/// Resolves both models and builds the ONNX analyzer for `backend`.
///
/// `progress` is called with a model name whenever a download is needed.
pub fn create_analyzer(
    backend: DetectorBackend,
    confidence: f64,
    models_dir: Option<&Path>,
    progress: impl Fn(&str) -> Option<ProgressFn>,
) -> Result<Box<dyn EmotionAnalyzer>, Box<dyn std::error::Error>> {
    let detector_source = backend.model_source();
    log::info!("Resolving model: {}", detector_source.name);
    let detector_path =
        model_resolver::resolve(detector_source, models_dir, progress(detector_source.name))?;

    log::info!("Resolving model: {}", EMOTION_MODEL.name);
    let emotion_path =
        model_resolver::resolve(EMOTION_MODEL, models_dir, progress(EMOTION_MODEL.name))?;

    let locator: Box<dyn FaceLocator> = match backend {
        DetectorBackend::Yolo => Box::new(OnnxYoloLocator::new(&detector_path, confidence)?),
        DetectorBackend::Blazeface => {
            Box::new(OnnxBlazefaceLocator::new(&detector_path, confidence)?)
        }
    };
    let classifier = OnnxEmotionClassifier::new(&emotion_path)?;

    log::info!("Using {backend} face detector (confidence={confidence})");
    Ok(Box::new(FaceEmotionAnalyzer::new(
        backend,
        locator,
        Box::new(classifier),
    )))
}
