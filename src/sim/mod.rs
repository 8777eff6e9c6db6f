//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed per-frame increments only
//! - Randomness only through the caller's RNG
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod physics;
pub mod spawner;
pub mod spectrum;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionResult};
pub use spawner::SpawnResult;
pub use spectrum::{AudioFeatures, SpectrumSource, SyntheticTrack};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickReport, tick};
