//! Beat Runner - an endless runner driven by the music you feed it
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spectrum features, spawning, physics, collisions)
//! - `game`: Session that ties one frame of simulation to one rendered frame
//! - `renderer`: Software scene renderer plus WebGPU presentation
//! - `platform`: Display-refresh frame scheduling
//! - `settings`: Render toggles and gameplay tuning

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Settings, Tuning};

/// Game configuration constants
///
/// All distances are in logical canvas pixels, all rates are per rendered frame.
pub mod consts {
    /// Logical drawing surface
    pub const CANVAS_WIDTH: u32 = 480;
    pub const CANVAS_HEIGHT: u32 = 270;

    /// Height of the ground band at the bottom of the canvas
    pub const GROUND_HEIGHT: f32 = 30.0;
    /// Y of the ground surface (player feet rest here)
    pub const GROUND_Y: f32 = CANVAS_HEIGHT as f32 - GROUND_HEIGHT;

    /// Downward acceleration, px/frame²
    pub const GRAVITY: f32 = 0.6;
    /// Jump impulse, px/frame (negative = up)
    pub const JUMP_FORCE: f32 = -10.0;

    /// Player hitbox, bottom-center anchored at (PLAYER_X, player.y)
    pub const PLAYER_X: f32 = CANVAS_WIDTH as f32 / 4.0;
    pub const PLAYER_WIDTH: f32 = 24.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;

    /// Entities appear just beyond the right edge...
    pub const SPAWN_X: f32 = CANVAS_WIDTH as f32 + 50.0;
    /// ...and are dropped once fully past the left edge
    pub const DESPAWN_X: f32 = -50.0;

    pub const OBSTACLE_WIDTH: f32 = 24.0;
    pub const OBSTACLE_HEIGHT: f32 = 30.0;
    pub const COIN_SIZE: f32 = 20.0;
    /// Coin lanes, measured up from the ground surface to the coin's top edge
    pub const COIN_LOW_LANE: f32 = 80.0;
    pub const COIN_HIGH_LANE: f32 = 140.0;

    /// Percent of the spectrum counted as bass (from the bottom)
    pub const BASS_PERCENT: usize = 15;
    /// Percent of the spectrum below the treble band
    pub const TREBLE_START_PERCENT: usize = 70;

    /// Ground grid line spacing
    pub const GRID_SPACING: f32 = 40.0;
}
