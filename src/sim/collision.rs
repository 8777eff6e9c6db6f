//! Collision detection and response
//!
//! Player vs entity is a plain axis-aligned box test. Coins are consumed,
//! obstacles end the run.

use glam::Vec2;

use super::state::{Entity, EntityKind, GameEvent, GameState};

/// Axis-aligned bounding box in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Half-open overlap test: boxes that only touch don't collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Result of one collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResult {
    /// Coins picked up this pass
    pub coins: u32,
    /// The obstacle that ended the run, if any
    pub hit_obstacle: Option<u32>,
}

/// Test the player against every live entity
///
/// Runs on the advanced but not yet pruned entity list. Stops at the first
/// obstacle hit; the run is over from that point on.
pub fn resolve(state: &mut GameState, coin_value: u32) -> CollisionResult {
    let player_box = state.player.hitbox();
    let mut result = CollisionResult::default();

    for i in 0..state.entities.len() {
        let entity: &mut Entity = &mut state.entities[i];
        if entity.is_collected() || !player_box.overlaps(&entity.aabb()) {
            continue;
        }

        match entity.kind {
            EntityKind::Coin { .. } => {
                entity.kind = EntityKind::Coin { collected: true };
                let id = entity.id;
                log::debug!("Coin {} collected at frame {}", id, state.game_time);
                state.events.push(GameEvent::CoinCollected { id });
                state.add_score(coin_value);
                result.coins += 1;
            }
            EntityKind::Obstacle => {
                result.hit_obstacle = Some(entity.id);
                state.end_run();
                break;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::GamePhase;

    fn running_state() -> GameState {
        let mut state = GameState::new();
        state.play();
        state.events.clear();
        state
    }

    fn push(state: &mut GameState, x: f32, y: f32, w: f32, h: f32, kind: EntityKind) -> u32 {
        let id = state.next_entity_id();
        state.entities.push(Entity { id, x, y, w, h, kind });
        id
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::from_rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::from_rect(20.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_aabb_touching_edges_do_not_overlap() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Aabb::from_rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::from_rect(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::from_rect(-10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_coin_collected_once() {
        let mut state = running_state();
        let coin_y = state.ground_y - PLAYER_HEIGHT;
        let id = push(
            &mut state,
            PLAYER_X - 5.0,
            coin_y,
            COIN_SIZE,
            COIN_SIZE,
            EntityKind::Coin { collected: false },
        );

        let result = resolve(&mut state, 50);
        assert_eq!(result.coins, 1);
        assert_eq!(state.score, 50);
        assert!(state.entities[0].is_collected());
        assert_eq!(
            state.events,
            vec![GameEvent::CoinCollected { id }, GameEvent::ScoreChanged(50)]
        );

        // Still overlapping, but already collected
        let result = resolve(&mut state, 50);
        assert_eq!(result.coins, 0);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_obstacle_ends_run() {
        let mut state = running_state();
        let id = push(
            &mut state,
            PLAYER_X - 4.0,
            GROUND_Y - OBSTACLE_HEIGHT,
            OBSTACLE_WIDTH,
            OBSTACLE_HEIGHT,
            EntityKind::Obstacle,
        );

        let result = resolve(&mut state, 50);
        assert_eq!(result.hit_obstacle, Some(id));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_airborne_player_clears_obstacle() {
        let mut state = running_state();
        state.player.y = state.ground_y - OBSTACLE_HEIGHT - 1.0;
        push(
            &mut state,
            PLAYER_X - 4.0,
            GROUND_Y - OBSTACLE_HEIGHT,
            OBSTACLE_WIDTH,
            OBSTACLE_HEIGHT,
            EntityKind::Obstacle,
        );

        let result = resolve(&mut state, 50);
        assert_eq!(result.hit_obstacle, None);
        assert!(state.is_running());
    }

    #[test]
    fn test_obstacle_stops_the_pass() {
        let mut state = running_state();
        push(
            &mut state,
            PLAYER_X - 4.0,
            GROUND_Y - OBSTACLE_HEIGHT,
            OBSTACLE_WIDTH,
            OBSTACLE_HEIGHT,
            EntityKind::Obstacle,
        );
        push(
            &mut state,
            PLAYER_X - 4.0,
            GROUND_Y - COIN_SIZE,
            COIN_SIZE,
            COIN_SIZE,
            EntityKind::Coin { collected: false },
        );

        resolve(&mut state, 50);
        assert!(state.is_game_over());
        assert_eq!(state.score, 0);
        assert!(!state.entities[1].is_collected());
    }
}
