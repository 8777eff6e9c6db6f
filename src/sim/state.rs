//! Game state and core simulation types
//!
//! One `GameState` per session. Every per-frame step reads and mutates it;
//! nothing else holds entity references across frames.

use super::collision::Aabb;
use super::physics;
use crate::consts::*;

/// Current phase of the session (the game clock's state machine)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Never started (or freshly reset)
    Idle,
    /// Actively simulating
    Running,
    /// Playback paused, simulation frozen, state preserved
    Paused,
    /// Run ended on an obstacle; frozen until the next play
    GameOver,
}

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Ground spike, ends the run on contact
    Obstacle,
    /// Floating pickup, worth points once
    Coin { collected: bool },
}

/// A world entity (box in canvas pixels, `y` is the top edge)
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_rect(self.x, self.y, self.w, self.h)
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.kind, EntityKind::Coin { collected: true })
    }
}

/// Vertical kinematics of the runner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Feet position (bottom edge of the hitbox)
    pub y: f32,
    pub vel_y: f32,
    pub is_jumping: bool,
}

impl Player {
    pub fn grounded(ground_y: f32) -> Self {
        Self {
            y: ground_y,
            vel_y: 0.0,
            is_jumping: false,
        }
    }

    /// Hitbox with its bottom-center at (PLAYER_X, y)
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_rect(
            PLAYER_X - PLAYER_WIDTH / 2.0,
            self.y - PLAYER_HEIGHT,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Score changed (coin, passive tick, reset)
    ScoreChanged(u32),
    /// New entity entered at the spawn edge
    Spawned { id: u32, kind: EntityKind },
    /// Coin picked up
    CoinCollected { id: u32 },
    /// Run ended with this score
    GameOver { score: u32 },
}

/// Complete per-session game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Runner kinematics
    pub player: Player,
    /// Ground surface (constant per canvas)
    pub ground_y: f32,
    /// World scroll, px/frame
    pub scroll_speed: f32,
    /// Active frame counter
    pub game_time: u64,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    /// Frames until the next obstacle may spawn
    pub bass_cooldown: u32,
    /// Frames until the next coin may spawn
    pub treble_cooldown: u32,
    /// Score
    pub score: u32,
    /// Pending host notifications
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Idle,
            player: Player::grounded(GROUND_Y),
            ground_y: GROUND_Y,
            scroll_speed: 3.0,
            game_time: 0,
            entities: Vec::new(),
            bass_cooldown: 0,
            treble_cooldown: 0,
            score: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Add points and notify
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Re-zero every field
    ///
    /// Queued events survive so the host still sees them, and entity IDs keep
    /// counting up across runs.
    pub fn reset(&mut self) {
        let events = std::mem::take(&mut self.events);
        *self = Self {
            events,
            next_id: self.next_id,
            ..Self::new()
        };
        if self.events.last() != Some(&GameEvent::ScoreChanged(0)) {
            self.events.push(GameEvent::ScoreChanged(0));
        }
    }

    /// External play command
    ///
    /// Starting fresh or after a game over resets the run; resuming from a
    /// pause keeps everything where it was.
    pub fn play(&mut self) {
        match self.phase {
            GamePhase::Running => {}
            GamePhase::GameOver => {
                log::info!("Restarting after game over (score {})", self.score);
                self.reset();
                self.phase = GamePhase::Running;
            }
            GamePhase::Idle | GamePhase::Paused if self.game_time == 0 => {
                log::info!("Starting new run");
                self.reset();
                self.phase = GamePhase::Running;
            }
            GamePhase::Idle | GamePhase::Paused => {
                log::info!("Resuming at frame {}", self.game_time);
                self.phase = GamePhase::Running;
            }
        }
    }

    /// External pause command (also used when the track ends)
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            log::info!("Paused at frame {}", self.game_time);
            self.phase = GamePhase::Paused;
        }
    }

    /// Jump intent, applied immediately so it can't be lost before the next step
    ///
    /// A no-op while airborne or when the run isn't active.
    pub fn jump(&mut self) {
        if self.phase == GamePhase::Running {
            physics::jump(&mut self.player);
        }
    }

    /// End the run
    pub fn end_run(&mut self) {
        log::info!("Game over at frame {} with score {}", self.game_time, self.score);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
    }
}
