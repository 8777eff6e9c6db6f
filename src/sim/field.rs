//! Scrolling entity field

use super::state::Entity;
use crate::consts::DESPAWN_X;

/// Move every live entity left by the scroll speed
pub fn advance(entities: &mut [Entity], scroll_speed: f32) {
    for entity in entities.iter_mut() {
        entity.x -= scroll_speed;
    }
}

/// Drop entities that left the screen or were consumed
///
/// Keeps spawn order for the survivors.
pub fn prune(entities: &mut Vec<Entity>) {
    entities.retain(|e| e.x >= DESPAWN_X && !e.is_collected());
}
