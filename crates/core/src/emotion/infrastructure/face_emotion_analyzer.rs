use crate::emotion::domain::emotion_analyzer::{
    AnalysisAction, AnalysisError, AnalyzeRequest, DetectorBackend, EmotionAnalyzer,
};
use crate::emotion::domain::emotion_classifier::EmotionClassifier;
use crate::emotion::domain::face_analysis::AnalysisRecord;
use crate::emotion::domain::face_locator::FaceLocator;
use crate::shared::frame::Frame;

/// Two-stage analyzer: locate faces, then classify each crop.
///
/// Built for a single detector backend; requests naming another backend are
/// rejected rather than silently served by the wrong model.
pub struct FaceEmotionAnalyzer {
    backend: DetectorBackend,
    locator: Box<dyn FaceLocator>,
    classifier: Box<dyn EmotionClassifier>,
}

impl FaceEmotionAnalyzer {
    pub fn new(
        backend: DetectorBackend,
        locator: Box<dyn FaceLocator>,
        classifier: Box<dyn EmotionClassifier>,
    ) -> Self {
        Self {
            backend,
            locator,
            classifier,
        }
    }
}

impl EmotionAnalyzer for FaceEmotionAnalyzer {
    fn analyze(
        &mut self,
        frame: &Frame,
        request: &AnalyzeRequest,
    ) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        if request.detector_backend != self.backend {
            return Err(AnalysisError::BackendMismatch {
                built: self.backend,
                requested: request.detector_backend,
            });
        }

        let regions = self
            .locator
            .locate(frame)
            .map_err(AnalysisError::Detection)?;
        if regions.is_empty() && request.enforce_detection {
            return Err(AnalysisError::FaceNotDetected);
        }
        if regions.is_empty() || !request.actions.contains(&AnalysisAction::Emotion) {
            return Ok(regions
                .into_iter()
                .map(|region| AnalysisRecord {
                    region: Some(region),
                    ..AnalysisRecord::default()
                })
                .collect());
        }

        let image = frame
            .to_rgb_image()
            .ok_or_else(|| AnalysisError::Classification("frame buffer size mismatch".into()))?;

        let mut records = Vec::with_capacity(regions.len());
        for region in regions {
            let Some(crop) = region.clamp_to(frame.width(), frame.height()) else {
                continue;
            };
            let face = image::imageops::crop_imm(
                &image,
                crop.x as u32,
                crop.y as u32,
                crop.width as u32,
                crop.height as u32,
            )
            .to_image();
            let scores = self
                .classifier
                .classify(&face)
                .map_err(AnalysisError::Classification)?;
            records.push(AnalysisRecord::from_scores(region, scores));
        }
        Ok(records)
    }
}
