//! Rendering module
//!
//! The scene is composed in a CPU framebuffer at the fixed logical resolution,
//! then presented through WebGPU with nearest-neighbor scaling.

pub mod font;
pub mod framebuffer;
pub mod palette;
pub mod present;
pub mod scene;
pub mod sprite;

pub use framebuffer::{Framebuffer, Rgba};
pub use present::PresentState;
pub use scene::draw_scene;
pub use sprite::Sprite;
