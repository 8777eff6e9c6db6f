//! Tiny 5x7 bitmap font for overlay text

use super::framebuffer::{Framebuffer, Rgba};

const GLYPH_W: i32 = 5;
const GLYPH_H: i32 = 7;
/// Horizontal advance including one column of spacing
const ADVANCE: i32 = GLYPH_W + 1;

/// Rows top to bottom, bit 4 is the leftmost column
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        _ => [0; 7],
    }
}

/// Rendered width of `text` in pixels
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        return 0;
    }
    (n * ADVANCE - 1) * scale.max(1)
}

pub fn text_height(scale: i32) -> i32 {
    GLYPH_H * scale.max(1)
}

/// Draw text with its top-left corner at (x, y)
pub fn draw_text(fb: &mut Framebuffer, x: i32, y: i32, text: &str, color: Rgba, scale: i32) {
    let s = scale.max(1);
    let mut cursor_x = x;

    for ch in text.chars() {
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_W {
                if (bits >> (GLYPH_W - 1 - col)) & 1 == 1 {
                    fb.fill_rect(cursor_x + col * s, y + row as i32 * s, s, s, color);
                }
            }
        }
        cursor_x += ADVANCE * s;
    }
}

/// Draw text horizontally centered on `center_x`
pub fn draw_text_centered(fb: &mut Framebuffer, center_x: i32, y: i32, text: &str, color: Rgba, scale: i32) {
    let x = center_x - text_width(text, scale) / 2;
    draw_text(fb, x, y, text, color, scale);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("GAME OVER", 1), 9 * 6 - 1);
        assert_eq!(text_width("GAME OVER", 3), (9 * 6 - 1) * 3);
    }

    #[test]
    fn test_overlay_strings_have_glyphs() {
        for ch in "GAMEOVERPRESSPLAYTORESTART".chars() {
            assert_ne!(glyph(ch), [0; 7], "missing glyph for {ch}");
        }
        assert_eq!(glyph(' '), [0; 7]);
    }

    #[test]
    fn test_draw_text_sets_glyph_pixels() {
        let mut fb = Framebuffer::new(16, 10);
        fb.clear([0, 0, 0, 255]);
        draw_text(&mut fb, 1, 1, "T", [255, 255, 255, 255], 1);
        // Top bar of the T, then its stem
        for x in 1..6 {
            assert_eq!(fb.pixel(x, 1), Some([255, 255, 255, 255]));
        }
        assert_eq!(fb.pixel(3, 7), Some([255, 255, 255, 255]));
        assert_eq!(fb.pixel(1, 7), Some([0, 0, 0, 255]));
    }
}
