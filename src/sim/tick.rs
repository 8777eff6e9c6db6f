//! Per-frame simulation tick
//!
//! Core game loop that advances the run by exactly one rendered frame.
//! Step order is observable and must not change:
//! spawn → scroll speed → physics → advance → collide → passive score → prune.

use rand::Rng;

use super::collision::{self, CollisionResult};
use super::field;
use super::physics;
use super::spawner::{self, SpawnResult};
use super::spectrum::AudioFeatures;
use super::state::GameState;
use crate::settings::Tuning;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub spawned: SpawnResult,
    pub collisions: CollisionResult,
}

/// Advance the game state by one frame
///
/// Does nothing unless the run is active.
pub fn tick<R: Rng>(
    state: &mut GameState,
    features: &AudioFeatures,
    tuning: &Tuning,
    rng: &mut R,
) -> TickReport {
    if !state.is_running() {
        return TickReport::default();
    }

    state.game_time += 1;

    // Beat-driven spawning
    spawner::tick_cooldowns(state);
    let spawned = spawner::spawn(state, features, tuning, rng);
    state.scroll_speed = spawner::scroll_speed_for(features.volume, tuning);

    physics::step(&mut state.player, state.ground_y);

    field::advance(&mut state.entities, state.scroll_speed);

    // Collide against the unpruned list
    let collisions = collision::resolve(state, tuning.coin_value);
    if state.is_game_over() {
        return TickReport {
            spawned,
            collisions,
        };
    }

    if state.game_time % tuning.passive_interval == 0 {
        state.add_score(1);
    }

    field::prune(&mut state.entities);

    TickReport {
        spawned,
        collisions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Entity, EntityKind, GameEvent, GamePhase};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BINS: usize = 64;

    /// Spectrum with a flat bass band and a flat treble band
    fn spectrum(bass: u8, treble: u8) -> Vec<u8> {
        let mut bins = vec![0u8; BINS];
        bins[..BINS * BASS_PERCENT / 100].fill(bass);
        bins[BINS * TREBLE_START_PERCENT / 100..].fill(treble);
        bins
    }

    fn running() -> (GameState, Pcg32) {
        let mut state = GameState::new();
        state.play();
        state.events.clear();
        (state, Pcg32::seed_from_u64(12345))
    }

    #[test]
    fn test_tick_idle_does_nothing() {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let before = state.clone();
        let f = AudioFeatures::from_bins(&spectrum(255, 255));
        tick(&mut state, &f, &Tuning::default(), &mut rng);
        assert_eq!(state, before);
    }

    #[test]
    fn test_tick_paused_does_nothing() {
        let (mut state, mut rng) = running();
        let f = AudioFeatures::from_bins(&spectrum(0, 0));
        tick(&mut state, &f, &Tuning::default(), &mut rng);
        state.pause();
        let before = state.clone();
        tick(&mut state, &AudioFeatures::from_bins(&spectrum(255, 255)), &Tuning::default(), &mut rng);
        assert_eq!(state, before);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_bass_beat_spawns_one_obstacle() {
        let (mut state, mut rng) = running();
        let f = AudioFeatures::from_bins(&spectrum(200, 0));
        assert_eq!(f.bass, 200.0);

        let report = tick(&mut state, &f, &Tuning::default(), &mut rng);
        assert!(report.spawned.obstacle.is_some());
        assert!(report.spawned.coin.is_none());
        assert_eq!(state.entities.len(), 1);

        // Spawned at 530, then advanced with everyone else this frame
        let e = &state.entities[0];
        assert_eq!(e.x, SPAWN_X - state.scroll_speed);
        assert_eq!(e.y, state.ground_y - OBSTACLE_HEIGHT);
        assert_eq!(state.bass_cooldown, 25);
    }

    #[test]
    fn test_treble_beat_spawns_one_coin() {
        let (mut state, mut rng) = running();
        let f = AudioFeatures::from_bins(&spectrum(0, 120));
        let report = tick(&mut state, &f, &Tuning::default(), &mut rng);
        assert!(report.spawned.coin.is_some());
        assert_eq!(state.entities.len(), 1);
        let e = &state.entities[0];
        assert!(e.y == state.ground_y - 80.0 || e.y == state.ground_y - 140.0);
    }

    #[test]
    fn test_scroll_speed_follows_volume() {
        let (mut state, mut rng) = running();
        let f = AudioFeatures {
            bass: 0.0,
            treble: 0.0,
            volume: 0.5,
        };
        tick(&mut state, &f, &Tuning::default(), &mut rng);
        assert_eq!(state.scroll_speed, 5.0);

        // Overwritten, not smoothed
        tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        assert_eq!(state.scroll_speed, 3.0);
    }

    #[test]
    fn test_passive_tick_every_ten_frames() {
        let (mut state, mut rng) = running();
        for _ in 0..9 {
            tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        }
        assert_eq!(state.score, 0);
        tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        assert_eq!(state.score, 1);
        assert_eq!(state.events, vec![GameEvent::ScoreChanged(1)]);
    }

    #[test]
    fn test_jump_applies_on_next_step() {
        let (mut state, mut rng) = running();
        state.jump();
        assert_eq!(state.player.vel_y, -10.0);
        assert!(state.player.is_jumping);
        state.jump();
        assert_eq!(state.player.vel_y, -10.0);

        tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        assert!(state.player.y < state.ground_y);
        assert!(state.player.is_jumping);
    }

    #[test]
    fn test_coin_pickup_scores_and_prunes() {
        let (mut state, mut rng) = running();
        let id = state.next_entity_id();
        // Lands on the player after a 3px advance
        state.entities.push(Entity {
            id,
            x: PLAYER_X + 3.0,
            y: state.ground_y - COIN_SIZE,
            w: COIN_SIZE,
            h: COIN_SIZE,
            kind: EntityKind::Coin { collected: false },
        });

        tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        assert_eq!(state.score, 50);
        assert!(state.entities.is_empty());
        assert!(state.events.contains(&GameEvent::CoinCollected { id }));
    }

    #[test]
    fn test_offscreen_entity_pruned_same_frame() {
        let (mut state, mut rng) = running();
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            x: DESPAWN_X + 1.0,
            y: 0.0,
            w: OBSTACLE_WIDTH,
            h: OBSTACLE_HEIGHT,
            kind: EntityKind::Obstacle,
        });
        tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_obstacle_hit_freezes_everything() {
        let (mut state, mut rng) = running();
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            x: PLAYER_X,
            y: state.ground_y - OBSTACLE_HEIGHT,
            w: OBSTACLE_WIDTH,
            h: OBSTACLE_HEIGHT,
            kind: EntityKind::Obstacle,
        });

        // Frame 10 would be a passive tick; the hit must win
        state.game_time = 9;
        let report = tick(&mut state, &AudioFeatures::SILENT, &Tuning::default(), &mut rng);
        assert_eq!(report.collisions.hit_obstacle, Some(id));
        assert!(state.is_game_over());
        assert_eq!(state.score, 0);

        let frozen = state.clone();
        for _ in 0..30 {
            state.jump();
            tick(&mut state, &AudioFeatures::from_bins(&spectrum(255, 255)), &Tuning::default(), &mut rng);
        }
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed and input produce identical results
        let (mut a, mut rng_a) = running();
        let (mut b, mut rng_b) = running();
        let tuning = Tuning::default();

        for frame in 0..200u32 {
            let bins = spectrum((frame * 37 % 256) as u8, (frame * 91 % 256) as u8);
            let f = AudioFeatures::from_bins(&bins);
            if frame % 40 == 0 {
                a.jump();
                b.jump();
            }
            tick(&mut a, &f, &tuning, &mut rng_a);
            tick(&mut b, &f, &tuning, &mut rng_b);
        }

        assert_eq!(a, b);
    }

    fn frames() -> impl Strategy<Value = Vec<(u8, u8, bool)>> {
        prop::collection::vec((any::<u8>(), any::<u8>(), prop::bool::weighted(0.1)), 1..400)
    }

    proptest! {
        #[test]
        fn prop_player_never_below_ground(input in frames(), seed in any::<u64>()) {
            let mut state = GameState::new();
            state.play();
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();

            for (bass, treble, jump) in input {
                if jump {
                    state.jump();
                }
                tick(&mut state, &AudioFeatures::from_bins(&spectrum(bass, treble)), &tuning, &mut rng);
                prop_assert!(state.player.y <= state.ground_y);
            }
        }

        #[test]
        fn prop_no_stale_entities_after_tick(input in frames(), seed in any::<u64>()) {
            let mut state = GameState::new();
            state.play();
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();

            for (bass, treble, jump) in input {
                if jump {
                    state.jump();
                }
                tick(&mut state, &AudioFeatures::from_bins(&spectrum(bass, treble)), &tuning, &mut rng);
                if state.is_game_over() {
                    break;
                }
                for e in &state.entities {
                    prop_assert!(e.x >= DESPAWN_X);
                    prop_assert!(!e.is_collected());
                }
            }
        }

        #[test]
        fn prop_spawn_gaps_respect_cooldowns(input in frames(), seed in any::<u64>()) {
            let mut state = GameState::new();
            state.play();
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();
            let mut last_obstacle: Option<u64> = None;
            let mut last_coin: Option<u64> = None;

            for (bass, treble, jump) in input {
                if jump {
                    state.jump();
                }
                state.events.clear();
                tick(&mut state, &AudioFeatures::from_bins(&spectrum(bass, treble)), &tuning, &mut rng);

                for event in &state.events {
                    if let GameEvent::Spawned { kind, .. } = event {
                        let (last, gap) = match kind {
                            EntityKind::Obstacle => (&mut last_obstacle, tuning.bass_cooldown),
                            EntityKind::Coin { .. } => (&mut last_coin, tuning.treble_cooldown),
                        };
                        if let Some(prev) = *last {
                            prop_assert!(state.game_time - prev >= u64::from(gap));
                        }
                        *last = Some(state.game_time);
                    }
                }

                if state.is_game_over() {
                    break;
                }
            }
        }

        #[test]
        fn prop_game_over_is_terminal(input in frames(), seed in any::<u64>()) {
            let mut state = GameState::new();
            state.play();
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();
            let mut frozen: Option<GameState> = None;

            for (bass, treble, jump) in input {
                if jump {
                    state.jump();
                }
                tick(&mut state, &AudioFeatures::from_bins(&spectrum(bass, treble)), &tuning, &mut rng);

                match &frozen {
                    Some(snapshot) => {
                        prop_assert_eq!(state.score, snapshot.score);
                        prop_assert_eq!(&state.entities, &snapshot.entities);
                        prop_assert_eq!(state.player, snapshot.player);
                        prop_assert_eq!(state.game_time, snapshot.game_time);
                    }
                    None if state.is_game_over() => frozen = Some(state.clone()),
                    None => {}
                }
            }
        }

        #[test]
        fn prop_coin_scores_exactly_once(seed in any::<u64>(), frames in 1..200usize) {
            let mut state = GameState::new();
            state.play();
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();

            for _ in 0..frames {
                state.events.clear();
                let before = state.score;
                let report = tick(&mut state, &AudioFeatures::from_bins(&spectrum(0, 255)), &tuning, &mut rng);
                let passive = u32::from(state.game_time % tuning.passive_interval == 0);
                prop_assert_eq!(state.score - before, report.collisions.coins * tuning.coin_value + passive);
            }
        }
    }
}
