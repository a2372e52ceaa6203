use crate::emotion::domain::emotion_label::DisplayLanguage;
use crate::shared::constants::{BOX_THICKNESS, DEFAULT_FONT_SIZE, OVERLAY_COLOR, TEXT_OFFSET};

/// Immutable overlay settings, resolved once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub language: DisplayLanguage,
    /// Label height in pixels.
    pub font_size: f32,
    /// Gap between the face box and its label.
    pub text_offset: i32,
    pub box_color: [u8; 3],
    pub text_color: [u8; 3],
    pub box_thickness: i32,
}

impl OverlayStyle {
    pub fn new(language: DisplayLanguage, font_size: f32) -> Self {
        Self {
            language,
            font_size,
            ..Self::default()
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            language: DisplayLanguage::default(),
            font_size: DEFAULT_FONT_SIZE,
            text_offset: TEXT_OFFSET,
            box_color: OVERLAY_COLOR,
            text_color: OVERLAY_COLOR,
            box_thickness: BOX_THICKNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = OverlayStyle::default();
        assert_eq!(style.language, DisplayLanguage::Chinese);
        assert_eq!(style.font_size, 30.0);
        assert_eq!(style.text_offset, 5);
        assert_eq!(style.box_color, [0, 255, 0]);
        assert_eq!(style.box_thickness, 2);
    }

    #[test]
    fn test_new_overrides_language_and_size() {
        let style = OverlayStyle::new(DisplayLanguage::English, 18.0);
        assert_eq!(style.language, DisplayLanguage::English);
        assert_eq!(style.font_size, 18.0);
        assert_eq!(style.text_offset, 5);
    }
}
