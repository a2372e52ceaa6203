use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::shared::constants::{BLAZEFACE_MODEL_NAME, YOLO_MODEL_NAME, YOLO_MODEL_URL};
use crate::shared::frame::Frame;
use crate::shared::model_resolver::ModelSource;

use super::face_analysis::AnalysisRecord;

/// Domain interface for the face-analysis boundary.
///
/// Implementations may hold inference sessions, hence `&mut self`.
pub trait EmotionAnalyzer {
    fn analyze(
        &mut self,
        frame: &Frame,
        request: &AnalyzeRequest,
    ) -> Result<Vec<AnalysisRecord>, AnalysisError>;
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Only raised when `enforce_detection` is set and the frame has no face.
    #[error("Face could not be detected")]
    FaceNotDetected,
    #[error("analyzer was built for detector '{built}', request asked for '{requested}'")]
    BackendMismatch {
        built: DetectorBackend,
        requested: DetectorBackend,
    },
    #[error("face detection failed: {0}")]
    Detection(#[source] Box<dyn std::error::Error>),
    #[error("emotion classification failed: {0}")]
    Classification(#[source] Box<dyn std::error::Error>),
}

/// Attribute the analyzer is asked to estimate for each face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisAction {
    Emotion,
}

/// Face detector the analyzer runs before classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetectorBackend {
    #[default]
    Yolo,
    Blazeface,
}

impl DetectorBackend {
    pub fn name(self) -> &'static str {
        match self {
            DetectorBackend::Yolo => "yolo",
            DetectorBackend::Blazeface => "blazeface",
        }
    }

    pub fn model_source(self) -> ModelSource<'static> {
        match self {
            DetectorBackend::Yolo => ModelSource {
                name: YOLO_MODEL_NAME,
                url: Some(YOLO_MODEL_URL),
            },
            DetectorBackend::Blazeface => ModelSource {
                name: BLAZEFACE_MODEL_NAME,
                url: None,
            },
        }
    }
}

impl fmt::Display for DetectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DetectorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yolo" => Ok(DetectorBackend::Yolo),
            "blazeface" => Ok(DetectorBackend::Blazeface),
            other => Err(format!(
                "Detector must be 'yolo' or 'blazeface', got '{other}'"
            )),
        }
    }
}

/// Parameters for one analysis call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub actions: Vec<AnalysisAction>,
    /// When false, a frame without faces yields an empty list instead of
    /// [`AnalysisError::FaceNotDetected`].
    pub enforce_detection: bool,
    pub detector_backend: DetectorBackend,
}

impl AnalyzeRequest {
    /// Emotion classification only, tolerant of frames without faces.
    pub fn emotion_only(detector_backend: DetectorBackend) -> Self {
        Self {
            actions: vec![AnalysisAction::Emotion],
            enforce_detection: false,
            detector_backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_emotion_only_request() {
        let request = AnalyzeRequest::emotion_only(DetectorBackend::Blazeface);
        assert_eq!(request.actions, vec![AnalysisAction::Emotion]);
        assert!(!request.enforce_detection);
        assert_eq!(request.detector_backend, DetectorBackend::Blazeface);
    }

    #[rstest]
    #[case("yolo", DetectorBackend::Yolo)]
    #[case("BlazeFace", DetectorBackend::Blazeface)]
    fn test_backend_from_str(#[case] input: &str, #[case] expected: DetectorBackend) {
        assert_eq!(input.parse::<DetectorBackend>().unwrap(), expected);
    }

    #[test]
    fn test_backend_from_str_rejects_unknown() {
        let err = "retinaface".parse::<DetectorBackend>().unwrap_err();
        assert!(err.contains("retinaface"));
    }

    #[test]
    fn test_backend_model_sources() {
        assert!(DetectorBackend::Yolo.model_source().url.is_some());
        assert!(DetectorBackend::Blazeface.model_source().url.is_none());
    }

    #[test]
    fn test_face_not_detected_message() {
        assert_eq!(
            AnalysisError::FaceNotDetected.to_string(),
            "Face could not be detected"
        );
    }
}
