/// BlazeFace face locator using ONNX Runtime via `ort`.
///
/// Lightweight short-range detector: 128×128 input, 896 anchors, boxes only.
use std::path::Path;

use crate::emotion::domain::face_locator::FaceLocator;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::math::{nms, ScoredBox};

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output (box + 6 keypoints).
const REGRESSOR_STRIDE: usize = 16;

pub struct OnnxBlazefaceLocator {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceLocator {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session,
            confidence,
            anchors: generate_anchors(),
        })
    }
}

impl FaceLocator for OnnxBlazefaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let input_tensor = preprocess(frame, INPUT_SIZE);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1]
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let mut candidates = decode(
            &self.anchors,
            reg_data,
            score_data,
            self.confidence,
            frame.width(),
            frame.height(),
        );
        let kept = nms(&mut candidates, NMS_IOU_THRESH);

        Ok(kept
            .iter()
            .filter_map(|d| Region::from_corners(d.bbox, frame.width(), frame.height()))
            .collect())
    }
}

/// Decodes anchor-relative boxes above `confidence` into frame coordinates.
fn decode(
    anchors: &[[f32; 2]],
    reg_data: &[f32],
    score_data: &[f32],
    confidence: f64,
    frame_width: u32,
    frame_height: u32,
) -> Vec<ScoredBox> {
    let size = INPUT_SIZE as f32;
    let fw = frame_width as f32;
    let fh = frame_height as f32;

    score_data
        .iter()
        .zip(anchors)
        .enumerate()
        .filter_map(|(i, (&raw_score, anchor))| {
            let score = sigmoid(raw_score);
            if (score as f64) < confidence {
                return None;
            }
            let reg = reg_data.get(i * REGRESSOR_STRIDE..i * REGRESSOR_STRIDE + 4)?;

            let cx = anchor[0] + reg[0] / size;
            let cy = anchor[1] + reg[1] / size;
            let w = reg[2] / size;
            let h = reg[3] / size;

            Some(ScoredBox {
                bbox: [
                    ((cx - w / 2.0) * fw) as f64,
                    ((cy - h / 2.0) * fh) as f64,
                    ((cx + w / 2.0) * fw) as f64,
                    ((cy + h / 2.0) * fh) as f64,
                ],
                score: score as f64,
            })
        })
        .collect()
}

/// Resize frame to `size × size` and normalize to [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

/// Short-range anchors: a 16×16 grid with 2 anchors per cell and an
/// 8×8 grid with 6 anchors per cell.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, num) in &strides {
        let grid_size = INPUT_SIZE as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
