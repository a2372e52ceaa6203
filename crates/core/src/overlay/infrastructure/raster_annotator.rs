use ab_glyph::PxScale;
use image::Rgb;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::overlay::domain::frame_annotator::FrameAnnotator;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::builtin_font;
use super::overlay_font::OverlayFont;

/// Draws boxes and labels straight into the RGB frame buffer.
///
/// Shapes partly outside the frame are clipped.
pub struct RasterAnnotator {
    font: OverlayFont,
}

impl RasterAnnotator {
    pub fn new(font: OverlayFont) -> Self {
        Self { font }
    }
}

impl FrameAnnotator for RasterAnnotator {
    fn draw_rectangle(
        &self,
        frame: &mut Frame,
        region: &Region,
        color: [u8; 3],
        thickness: i32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if region.is_empty() {
            return Err(format!(
                "cannot draw empty region {}x{} at ({}, {})",
                region.width, region.height, region.x, region.y
            )
            .into());
        }
        // nested outlines, growing inward so the stroke stays inside the face box
        let rings: Vec<Rect> = (0..thickness.max(1))
            .map(|i| (i, region.width - 2 * i, region.height - 2 * i))
            .take_while(|&(_, w, h)| w > 0 && h > 0)
            .map(|(i, w, h)| Rect::at(region.x + i, region.y + i).of_size(w as u32, h as u32))
            .collect();
        frame.draw_on_image(|image| {
            for ring in rings {
                draw_hollow_rect_mut(image, ring, Rgb(color));
            }
        })
    }

    fn draw_text(
        &self,
        frame: &mut Frame,
        position: (i32, i32),
        text: &str,
        color: [u8; 3],
        font_size: f32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.font {
            OverlayFont::TrueType(font) => frame.draw_on_image(|image| {
                draw_text_mut(
                    image,
                    Rgb(color),
                    position.0,
                    position.1,
                    PxScale::from(font_size),
                    font,
                    text,
                );
            }),
            OverlayFont::Builtin => {
                builtin_font::draw_text(frame, position, text, color, font_size);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::domain::emotion_label::DisplayLanguage;
    use crate::overlay::domain::face_annotation::FaceAnnotation;
    use crate::overlay::domain::overlay_style::OverlayStyle;

    const GREEN: [u8; 3] = [0, 255, 0];
    const BLACK: [u8; 3] = [0, 0, 0];

    fn annotator() -> RasterAnnotator {
        RasterAnnotator::new(OverlayFont::Builtin)
    }

    fn count(frame: &Frame, rgb: [u8; 3]) -> usize {
        frame
            .data()
            .chunks_exact(3)
            .filter(|px| *px == rgb)
            .count()
    }

    // --- rectangles ---

    #[test]
    fn test_rectangle_outline_thickness_one() {
        let mut frame = Frame::filled(20, 20, BLACK, 0);
        annotator()
            .draw_rectangle(&mut frame, &Region::new(2, 3, 5, 4), GREEN, 1)
            .unwrap();
        // perimeter of a 5x4 box
        assert_eq!(count(&frame, GREEN), 14);
        assert_eq!(frame.pixel(2, 3), Some(GREEN));
        assert_eq!(frame.pixel(6, 6), Some(GREEN));
        assert_eq!(frame.pixel(4, 4), Some(BLACK));
        assert_eq!(frame.pixel(7, 3), Some(BLACK));
    }

    #[test]
    fn test_rectangle_thickness_two_keeps_interior() {
        let mut frame = Frame::filled(20, 20, BLACK, 0);
        annotator()
            .draw_rectangle(&mut frame, &Region::new(0, 0, 10, 10), GREEN, 2)
            .unwrap();
        assert_eq!(count(&frame, GREEN), 100 - 36);
        assert_eq!(frame.pixel(1, 1), Some(GREEN));
        assert_eq!(frame.pixel(2, 2), Some(BLACK));
    }

    #[test]
    fn test_rectangle_thicker_than_box_fills_it() {
        let mut frame = Frame::filled(10, 10, BLACK, 0);
        annotator()
            .draw_rectangle(&mut frame, &Region::new(1, 1, 3, 3), GREEN, 5)
            .unwrap();
        assert_eq!(count(&frame, GREEN), 9);
    }

    #[test]
    fn test_rectangle_partly_outside_is_clipped() {
        let mut frame = Frame::filled(10, 10, BLACK, 0);
        annotator()
            .draw_rectangle(&mut frame, &Region::new(-5, -5, 10, 10), GREEN, 1)
            .unwrap();
        // only the right and bottom edges remain visible
        assert_eq!(frame.pixel(4, 0), Some(GREEN));
        assert_eq!(frame.pixel(0, 4), Some(GREEN));
        assert_eq!(frame.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_empty_rectangle_is_error() {
        let mut frame = Frame::filled(10, 10, BLACK, 0);
        let err = annotator()
            .draw_rectangle(&mut frame, &Region::new(1, 1, 0, 5), GREEN, 2)
            .unwrap_err();
        assert!(err.to_string().contains("empty region"));
        assert_eq!(count(&frame, GREEN), 0);
    }

    // --- text ---

    #[test]
    fn test_builtin_text_lands_at_position() {
        let mut frame = Frame::filled(40, 20, BLACK, 0);
        annotator()
            .draw_text(&mut frame, (10, 5), "H", GREEN, 8.0)
            .unwrap();
        let lit: Vec<usize> = frame
            .data()
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, px)| *px == GREEN)
            .map(|(i, _)| i)
            .collect();
        assert!(!lit.is_empty());
        for i in lit {
            let (x, y) = (i % 40, i / 40);
            assert!((10..18).contains(&x) && (5..13).contains(&y));
        }
    }

    #[test]
    fn test_text_outside_frame_is_ok() {
        let mut frame = Frame::filled(10, 10, BLACK, 0);
        annotator()
            .draw_text(&mut frame, (50, 50), "Sad: 0.10", GREEN, 8.0)
            .unwrap();
        assert_eq!(count(&frame, GREEN), 0);
    }

    // --- full annotation ---

    #[test]
    fn test_annotate_draws_box_and_label() {
        let mut frame = Frame::filled(100, 100, BLACK, 0);
        let style = OverlayStyle::new(DisplayLanguage::English, 8.0);
        let annotation = FaceAnnotation {
            region: Region::new(30, 40, 20, 20),
            text: "Happy: 0.93".to_string(),
            text_position: (30, 27),
        };
        annotator().annotate(&mut frame, &annotation, &style).unwrap();
        assert_eq!(frame.pixel(30, 40), Some(GREEN));
        // some label pixel above the box
        let label_lit = (27..35)
            .flat_map(|y| (30..100).map(move |x| (x, y)))
            .any(|(x, y)| frame.pixel(x, y) == Some(GREEN));
        assert!(label_lit);
    }

    #[test]
    fn test_annotate_sizes_label_from_style() {
        let mut frame = Frame::filled(60, 40, BLACK, 0);
        let style = OverlayStyle::new(DisplayLanguage::English, 16.0);
        let annotation = FaceAnnotation {
            region: Region::new(40, 30, 10, 5),
            text: "H".to_string(),
            text_position: (0, 0),
        };
        annotator().annotate(&mut frame, &annotation, &style).unwrap();
        // 16 px glyph rows reach past the first 8 rows of the label
        let tall = (0..20)
            .flat_map(|x| (8..16).map(move |y| (x, y)))
            .any(|(x, y)| frame.pixel(x, y) == Some(GREEN));
        assert!(tall);
    }
}
