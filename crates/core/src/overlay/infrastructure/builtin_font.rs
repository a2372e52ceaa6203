//! Built-in 8×8 bitmap font used when no TrueType font could be loaded.
//!
//! Covers Basic Latin and Latin-1; any other character is drawn as an
//! empty box so the label keeps its shape.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

use crate::shared::frame::Frame;

const GLYPH_CELLS: i32 = 8;

/// Pixel size of one bitmap cell for a requested font size.
fn cell_size(font_size: f32) -> i32 {
    ((font_size / GLYPH_CELLS as f32).round() as i32).max(1)
}

/// Horizontal advance of one character.
fn advance(font_size: f32) -> i32 {
    cell_size(font_size) * GLYPH_CELLS
}

pub fn draw_text(
    frame: &mut Frame,
    position: (i32, i32),
    text: &str,
    color: [u8; 3],
    font_size: f32,
) {
    let cell = cell_size(font_size);
    let (mut x, y) = position;
    for ch in text.chars() {
        match glyph(ch) {
            Some(rows) => draw_glyph(frame, x, y, &rows, cell, color),
            None => draw_missing(frame, x, y, cell, color),
        }
        x += advance(font_size);
    }
}

fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch))
}

fn draw_glyph(frame: &mut Frame, x: i32, y: i32, rows: &[u8; 8], cell: i32, color: [u8; 3]) {
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_CELLS {
            // bit 0 is the leftmost column
            if bits & (1 << col) != 0 {
                fill_cell(frame, x + col * cell, y + row as i32 * cell, cell, color);
            }
        }
    }
}

fn draw_missing(frame: &mut Frame, x: i32, y: i32, cell: i32, color: [u8; 3]) {
    let last = GLYPH_CELLS - 2;
    for i in 1..=last {
        fill_cell(frame, x + i * cell, y + cell, cell, color);
        fill_cell(frame, x + i * cell, y + last * cell, cell, color);
        fill_cell(frame, x + cell, y + i * cell, cell, color);
        fill_cell(frame, x + last * cell, y + i * cell, cell, color);
    }
}

fn fill_cell(frame: &mut Frame, x: i32, y: i32, cell: i32, color: [u8; 3]) {
    for dy in 0..cell {
        for dx in 0..cell {
            frame.put_pixel(x + dx, y + dy, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GREEN: [u8; 3] = [0, 255, 0];

    fn lit_pixels(frame: &Frame) -> Vec<(i32, i32)> {
        let mut lit = Vec::new();
        for y in 0..frame.height() as i32 {
            for x in 0..frame.width() as i32 {
                if frame.pixel(x, y) == Some(GREEN) {
                    lit.push((x, y));
                }
            }
        }
        lit
    }

    #[rstest]
    #[case(30.0, 4)]
    #[case(8.0, 1)]
    #[case(2.0, 1)]
    #[case(16.0, 2)]
    fn test_cell_size(#[case] font_size: f32, #[case] expected: i32) {
        assert_eq!(cell_size(font_size), expected);
    }

    #[test]
    fn test_ascii_glyph_stays_in_its_cell() {
        let mut frame = Frame::filled(40, 20, [0, 0, 0], 0);
        draw_text(&mut frame, (4, 2), "A", GREEN, 8.0);
        let lit = lit_pixels(&frame);
        assert!(!lit.is_empty());
        assert!(lit
            .iter()
            .all(|&(x, y)| (4..12).contains(&x) && (2..10).contains(&y)));
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0], 0);
        draw_text(&mut frame, (0, 0), " ", GREEN, 8.0);
        assert!(lit_pixels(&frame).is_empty());
    }

    #[test]
    fn test_cjk_falls_back_to_box() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0], 0);
        draw_text(&mut frame, (0, 0), "开", GREEN, 8.0);
        let lit = lit_pixels(&frame);
        // hollow 6×6 outline inside the 8×8 cell
        assert_eq!(lit.len(), 20);
        assert!(lit.contains(&(1, 1)));
        assert!(lit.contains(&(6, 6)));
        assert!(!lit.contains(&(3, 3)));
    }

    #[test]
    fn test_characters_advance_horizontally() {
        let mut frame = Frame::filled(40, 10, [0, 0, 0], 0);
        draw_text(&mut frame, (0, 0), "II", GREEN, 8.0);
        let lit = lit_pixels(&frame);
        assert!(lit.iter().any(|&(x, _)| x < 8));
        assert!(lit.iter().any(|&(x, _)| x >= 8));
    }

    #[test]
    fn test_text_clipped_at_frame_edge() {
        let mut frame = Frame::filled(10, 10, [0, 0, 0], 0);
        draw_text(&mut frame, (-4, -4), "Happy: 0.93", GREEN, 30.0);
        assert_eq!(frame.width(), 10);
    }
}
