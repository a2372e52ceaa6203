/// FER+ emotion classifier using ONNX Runtime via `ort`.
///
/// Input is a 64×64 single-channel tensor of raw 0-255 intensities; the
/// model emits one logit per class which is softmaxed into [0, 1] scores.
use std::path::Path;

use image::imageops::FilterType;
use image::RgbImage;

use crate::emotion::domain::emotion_classifier::EmotionClassifier;
use crate::emotion::domain::emotion_scores::EmotionScores;

/// FER+ output order. `contempt` has no display translation and is shown verbatim.
pub const FERPLUS_LABELS: [&str; 8] = [
    "neutral", "happy", "surprise", "sad", "angry", "disgust", "fear", "contempt",
];

const INPUT_SIZE: u32 = 64;

pub struct OnnxEmotionClassifier {
    session: ort::session::Session,
}

impl OnnxEmotionClassifier {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self { session })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&mut self, face: &RgbImage) -> Result<EmotionScores, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(preprocess(face))?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Emotion model produced no outputs".into());
        }
        let logits = outputs[0].try_extract_array::<f32>()?;
        let data = logits.as_slice().ok_or("Cannot get logits slice")?;
        if data.len() < FERPLUS_LABELS.len() {
            return Err(format!(
                "Emotion model returned {} classes, expected {}",
                data.len(),
                FERPLUS_LABELS.len()
            )
            .into());
        }
        Ok(scores_from_logits(&data[..FERPLUS_LABELS.len()]))
    }
}

fn scores_from_logits(logits: &[f32]) -> EmotionScores {
    FERPLUS_LABELS
        .iter()
        .zip(softmax(logits))
        .map(|(&label, p)| (label, p as f64))
        .collect()
}

/// Grayscale 64×64 NCHW tensor with unnormalized intensities.
fn preprocess(face: &RgbImage) -> ndarray::Array4<f32> {
    let gray = image::imageops::grayscale(face);
    let resized = image::imageops::resize(&gray, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let s = INPUT_SIZE as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 1, s, s));
    for (x, y, pixel) in resized.enumerate_pixels() {
        tensor[[0, 0, y as usize, x as usize]] = pixel.0[0] as f32;
    }
    tensor
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
