use crate::emotion::domain::emotion_label::{translate_label, DisplayLanguage};
use crate::emotion::domain::face_analysis::Detection;
use crate::shared::region::Region;

use super::overlay_style::OverlayStyle;

/// Everything needed to draw one face: its box, label and label anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnnotation {
    pub region: Region,
    pub text: String,
    /// Top-left corner of the label.
    pub text_position: (i32, i32),
}

impl FaceAnnotation {
    pub fn for_detection(detection: &Detection, style: &OverlayStyle) -> Self {
        Self {
            region: detection.region,
            text: label_text(detection, style.language),
            text_position: text_position(&detection.region, style.font_size, style.text_offset),
        }
    }
}

/// `"<translated label>: <score to two decimals>"`.
pub fn label_text(detection: &Detection, language: DisplayLanguage) -> String {
    let name = translate_label(&detection.dominant_emotion, language);
    format!("{name}: {:.2}", detection.dominant_score())
}

/// Label anchor above the box, or below it when above would leave the frame.
pub fn text_position(region: &Region, font_size: f32, offset: i32) -> (i32, i32) {
    let above = region.y - font_size.round() as i32 - offset;
    if above < 0 {
        (region.x, region.bottom() + offset)
    } else {
        (region.x, above)
    }
}
