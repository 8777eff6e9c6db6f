//! Beat-driven procedural spawning
//!
//! Bass hits drop obstacles, treble hits float coins. Each class has its own
//! cooldown so a sustained beat can't flood the field.

use rand::Rng;

use super::spectrum::AudioFeatures;
use super::state::{Entity, EntityKind, GameEvent, GameState};
use crate::consts::*;
use crate::settings::Tuning;

/// What spawned this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnResult {
    pub obstacle: Option<u32>,
    pub coin: Option<u32>,
}

/// Scroll speed for the given volume (0-1), recomputed every frame
#[inline]
pub fn scroll_speed_for(volume: f32, tuning: &Tuning) -> f32 {
    tuning.min_scroll_speed + tuning.scroll_speed_range * volume
}

/// Count both cooldowns down one frame, never below zero
pub fn tick_cooldowns(state: &mut GameState) {
    state.bass_cooldown = state.bass_cooldown.saturating_sub(1);
    state.treble_cooldown = state.treble_cooldown.saturating_sub(1);
}

/// Apply both spawn rules; they are independent and may fire together
pub fn spawn<R: Rng>(
    state: &mut GameState,
    features: &AudioFeatures,
    tuning: &Tuning,
    rng: &mut R,
) -> SpawnResult {
    let mut result = SpawnResult::default();

    if state.bass_cooldown == 0 && features.bass > tuning.bass_threshold {
        result.obstacle = Some(spawn_obstacle(state));
        state.bass_cooldown = tuning.bass_cooldown;
    }

    if state.treble_cooldown == 0 && features.treble > tuning.treble_threshold {
        let high = rng.random_bool(0.5);
        result.coin = Some(spawn_coin(state, high));
        state.treble_cooldown = tuning.treble_cooldown;
    }

    result
}

/// Ground-anchored spike at the spawn edge
pub fn spawn_obstacle(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let kind = EntityKind::Obstacle;
    state.entities.push(Entity {
        id,
        x: SPAWN_X,
        y: state.ground_y - OBSTACLE_HEIGHT,
        w: OBSTACLE_WIDTH,
        h: OBSTACLE_HEIGHT,
        kind,
    });
    log::debug!("Obstacle {} spawned at frame {}", id, state.game_time);
    state.events.push(GameEvent::Spawned { id, kind });
    id
}

/// Coin at the spawn edge in the low or high lane
pub fn spawn_coin(state: &mut GameState, high_lane: bool) -> u32 {
    let id = state.next_entity_id();
    let lane = if high_lane { COIN_HIGH_LANE } else { COIN_LOW_LANE };
    let kind = EntityKind::Coin { collected: false };
    state.entities.push(Entity {
        id,
        x: SPAWN_X,
        y: state.ground_y - lane,
        w: COIN_SIZE,
        h: COIN_SIZE,
        kind,
    });
    log::debug!(
        "Coin {} spawned ({} lane) at frame {}",
        id,
        if high_lane { "high" } else { "low" },
        state.game_time
    );
    state.events.push(GameEvent::Spawned { id, kind });
    id
}
