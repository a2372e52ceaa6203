use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::face_annotation::FaceAnnotation;
use super::overlay_style::OverlayStyle;

/// Drawing primitives over a frame buffer.
///
/// Implementations modify the frame in place.
pub trait FrameAnnotator {
    fn draw_rectangle(
        &self,
        frame: &mut Frame,
        region: &Region,
        color: [u8; 3],
        thickness: i32,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn draw_text(
        &self,
        frame: &mut Frame,
        position: (i32, i32),
        text: &str,
        color: [u8; 3],
        font_size: f32,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Box outline followed by the label, both sized by `style`.
    fn annotate(
        &self,
        frame: &mut Frame,
        annotation: &FaceAnnotation,
        style: &OverlayStyle,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.draw_rectangle(
            frame,
            &annotation.region,
            style.box_color,
            style.box_thickness,
        )?;
        self.draw_text(
            frame,
            annotation.text_position,
            &annotation.text,
            style.text_color,
            style.font_size,
        )
    }
}
