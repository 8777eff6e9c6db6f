//! Player character art
//!
//! Either a host-supplied decoded image or the built-in procedural runner.

use super::framebuffer::{Framebuffer, Rgba};
use super::palette;

/// Decoded RGBA8 character image
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Sprite {
    /// Wrap a decoded image; `None` if the buffer doesn't match the dimensions
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            log::warn!(
                "Ignoring character image: {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                rgba.len()
            );
            return None;
        }

        Some(Self {
            width,
            height,
            pixels: bytemuck::cast_slice::<u8, Rgba>(&rgba).to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw scaled into a box whose bottom-center sits at (center_x, bottom)
    pub fn draw(&self, fb: &mut Framebuffer, center_x: i32, bottom: i32, size: i32) {
        fb.blit_nearest(
            &self.pixels,
            self.width,
            self.height,
            center_x - size / 2,
            bottom - size,
            size,
            size,
        );
    }
}

/// Leg animation frame length while running
const STRIDE_FRAMES: u64 = 6;

/// Built-in runner, bottom-center at (center_x, bottom)
///
/// Legs alternate every few frames on the ground and tuck in the air.
pub fn draw_builtin(fb: &mut Framebuffer, center_x: i32, bottom: i32, game_time: u64, airborne: bool) {
    let left = center_x - 12;
    let body_top = bottom - 24;

    // Body and visor
    fb.fill_rect(left + 2, body_top, 20, 16, palette::PLAYER_BODY);
    fb.fill_rect(left + 10, body_top + 4, 10, 4, palette::PLAYER_VISOR);

    let legs_top = body_top + 16;
    if airborne {
        fb.fill_rect(left + 6, legs_top, 12, 4, palette::PLAYER_LEGS);
        return;
    }

    let (front, back) = if (game_time / STRIDE_FRAMES) % 2 == 0 {
        (left + 14, left + 6)
    } else {
        (left + 16, left + 4)
    };
    fb.fill_rect(back, legs_top, 4, 8, palette::PLAYER_LEGS);
    fb.fill_rect(front, legs_top, 4, 8, palette::PLAYER_LEGS);
}
