//! Colors for scene elements

use super::framebuffer::Rgba;

pub const BACKGROUND: Rgba = [12, 10, 28, 255];
pub const GROUND: Rgba = [28, 22, 52, 255];
pub const GROUND_EDGE: Rgba = [255, 64, 160, 255];
pub const GRID_LINE: Rgba = [70, 48, 120, 255];

pub const BAR_LOW: Rgba = [40, 28, 90, 255];
pub const BAR_HIGH: Rgba = [90, 50, 160, 255];

pub const OBSTACLE: Rgba = [255, 70, 90, 255];
pub const COIN: Rgba = [255, 214, 64, 255];
pub const COIN_SHINE: Rgba = [255, 250, 200, 255];

pub const PLAYER_BODY: Rgba = [64, 220, 255, 255];
pub const PLAYER_VISOR: Rgba = [20, 24, 48, 255];
pub const PLAYER_LEGS: Rgba = [40, 150, 200, 255];

/// 60% black
pub const OVERLAY_DIM: Rgba = [0, 0, 0, 153];
pub const TEXT: Rgba = [255, 255, 255, 255];
pub const TEXT_ACCENT: Rgba = [255, 64, 160, 255];
