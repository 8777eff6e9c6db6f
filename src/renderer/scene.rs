//! Scene composition
//!
//! A pure function of the game state (plus this frame's spectrum) to pixels.
//! Draw order: background, spectrum bars, ground, entities, player, overlay.

use super::font;
use super::framebuffer::Framebuffer;
use super::palette;
use super::sprite::{self, Sprite};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Entity, EntityKind, GameState};

/// Number of spectrum bars across the canvas
const BAR_COUNT: usize = 32;
/// Tallest bar as a fraction of the sky height
const BAR_MAX_FRACTION: f32 = 0.7;
/// On-screen size of a custom character image
const SPRITE_DRAW_SIZE: i32 = 32;

/// Draw one complete frame
///
/// `spectrum` is `None` whenever playback isn't active; the bars are skipped
/// then, leaving the static scene.
pub fn draw_scene(
    fb: &mut Framebuffer,
    state: &GameState,
    spectrum: Option<&[u8]>,
    character: Option<&Sprite>,
    settings: &Settings,
) {
    fb.clear(palette::BACKGROUND);

    if settings.spectrum_bars
        && let Some(bins) = spectrum
    {
        draw_spectrum_bars(fb, bins, state.ground_y);
    }

    draw_ground(fb, state, settings);

    for entity in &state.entities {
        draw_entity(fb, entity);
    }

    draw_player(fb, state, character);

    if state.is_game_over() {
        draw_game_over(fb);
    }
}

fn draw_spectrum_bars(fb: &mut Framebuffer, bins: &[u8], ground_y: f32) {
    let n = bins.len();
    if n == 0 {
        return;
    }

    let bar_w = fb.width() as i32 / BAR_COUNT as i32;
    let max_h = ground_y * BAR_MAX_FRACTION;
    let floor = ground_y as i32;

    for i in 0..BAR_COUNT {
        let start = i * n / BAR_COUNT;
        let end = ((i + 1) * n / BAR_COUNT).max(start + 1).min(n);
        if start >= n {
            break;
        }
        let group = &bins[start..end];
        let level = group.iter().map(|&b| u32::from(b)).sum::<u32>() as f32 / group.len() as f32;

        let h = (level / 255.0 * max_h) as i32;
        if h <= 0 {
            continue;
        }
        let x = i as i32 * bar_w;
        fb.fill_rect(x, floor - h, bar_w - 1, h, palette::BAR_LOW);
        fb.fill_rect(x, floor - h, bar_w - 1, h.min(2), palette::BAR_HIGH);
    }
}

/// Horizontal grid offset in [0, GRID_SPACING)
pub fn grid_offset(state: &GameState, settings: &Settings) -> f32 {
    if !settings.effective_grid_scroll() {
        return 0.0;
    }
    (state.game_time as f32 * state.scroll_speed).rem_euclid(GRID_SPACING)
}

fn draw_ground(fb: &mut Framebuffer, state: &GameState, settings: &Settings) {
    let top = state.ground_y as i32;
    let width = fb.width() as i32;
    let band = fb.height() as i32 - top;

    fb.fill_rect(0, top, width, band, palette::GROUND);

    if settings.ground_grid {
        let offset = grid_offset(state, settings);
        let mut x = -offset;
        while x < width as f32 {
            fb.fill_rect(x.floor() as i32, top, 1, band, palette::GRID_LINE);
            x += GRID_SPACING;
        }
        fb.fill_rect(0, top + band / 2, width, 1, palette::GRID_LINE);
    }

    fb.fill_rect(0, top, width, 2, palette::GROUND_EDGE);
}

fn draw_entity(fb: &mut Framebuffer, entity: &Entity) {
    match entity.kind {
        EntityKind::Obstacle => {
            let bottom = entity.y + entity.h;
            fb.fill_triangle(
                (entity.x, bottom),
                (entity.x + entity.w / 2.0, entity.y),
                (entity.x + entity.w, bottom),
                palette::OBSTACLE,
            );
        }
        EntityKind::Coin { collected: true } => {}
        EntityKind::Coin { collected: false } => {
            // Four blocks around a bright center
            let x = entity.x.floor() as i32;
            let y = entity.y.floor() as i32;
            let w = entity.w as i32;
            let h = entity.h as i32;
            let s = (w / 3).max(1);
            let cx = x + (w - s) / 2;
            let cy = y + (h - s) / 2;

            fb.fill_rect(cx, y, s, s, palette::COIN);
            fb.fill_rect(cx, y + h - s, s, s, palette::COIN);
            fb.fill_rect(x, cy, s, s, palette::COIN);
            fb.fill_rect(x + w - s, cy, s, s, palette::COIN);
            fb.fill_rect(cx, cy, s, s, palette::COIN_SHINE);
        }
    }
}

fn draw_player(fb: &mut Framebuffer, state: &GameState, character: Option<&Sprite>) {
    let center_x = PLAYER_X as i32;
    let bottom = state.player.y.floor() as i32;

    match character {
        Some(sprite) => sprite.draw(fb, center_x, bottom, SPRITE_DRAW_SIZE),
        None => sprite::draw_builtin(fb, center_x, bottom, state.game_time, state.player.is_jumping),
    }
}

fn draw_game_over(fb: &mut Framebuffer) {
    let (w, h) = (fb.width() as i32, fb.height() as i32);
    fb.blend_rect(0, 0, w, h, palette::OVERLAY_DIM);

    let title_y = h / 2 - font::text_height(3) - 4;
    font::draw_text_centered(fb, w / 2, title_y, "GAME OVER", palette::TEXT_ACCENT, 3);
    font::draw_text_centered(fb, w / 2, h / 2 + 8, "PRESS PLAY TO RESTART", palette::TEXT, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(state: &GameState, spectrum: Option<&[u8]>, settings: &Settings) -> Framebuffer {
        let mut fb = Framebuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        draw_scene(&mut fb, state, spectrum, None, settings);
        fb
    }

    fn with_entity(kind: EntityKind, x: f32, y: f32, w: f32, h: f32) -> GameState {
        let mut state = GameState::new();
        let id = state.next_entity_id();
        state.entities.push(Entity { id, x, y, w, h, kind });
        state
    }

    #[test]
    fn test_background_visible_in_sky() {
        let fb = frame(&GameState::new(), None, &Settings::default());
        assert_eq!(fb.pixel(400, 10), Some(palette::BACKGROUND));
        assert_eq!(fb.pixel(400, GROUND_Y as i32), Some(palette::GROUND_EDGE));
    }

    #[test]
    fn test_obstacle_drawn_as_spike() {
        let state = with_entity(EntityKind::Obstacle, 300.0, GROUND_Y - 30.0, 24.0, 30.0);
        let fb = frame(&state, None, &Settings::default());
        // Wide near the base, empty at the top corners
        assert_eq!(fb.pixel(312, GROUND_Y as i32 - 3), Some(palette::OBSTACLE));
        assert_eq!(fb.pixel(301, GROUND_Y as i32 - 29), Some(palette::BACKGROUND));
    }

    #[test]
    fn test_collected_coin_not_drawn() {
        let live = with_entity(EntityKind::Coin { collected: false }, 300.0, 100.0, 20.0, 20.0);
        let gone = with_entity(EntityKind::Coin { collected: true }, 300.0, 100.0, 20.0, 20.0);

        let fb = frame(&live, None, &Settings::default());
        assert_eq!(fb.pixel(309, 109), Some(palette::COIN_SHINE));
        assert_eq!(fb.pixel(301, 109), Some(palette::COIN));
        // Star corners stay empty
        assert_eq!(fb.pixel(300, 100), Some(palette::BACKGROUND));

        let fb = frame(&gone, None, &Settings::default());
        assert_eq!(fb.pixel(309, 109), Some(palette::BACKGROUND));
    }

    #[test]
    fn test_bars_only_with_spectrum() {
        let bins = [255u8; 64];
        let settings = Settings::default();
        let spot = (8, GROUND_Y as i32 - 10);

        let fb = frame(&GameState::new(), Some(&bins), &settings);
        assert_eq!(fb.pixel(spot.0, spot.1), Some(palette::BAR_LOW));

        let fb = frame(&GameState::new(), None, &settings);
        assert_eq!(fb.pixel(spot.0, spot.1), Some(palette::BACKGROUND));

        let off = Settings {
            spectrum_bars: false,
            ..Settings::default()
        };
        let fb = frame(&GameState::new(), Some(&bins), &off);
        assert_eq!(fb.pixel(spot.0, spot.1), Some(palette::BACKGROUND));
    }

    #[test]
    fn test_grid_offset_wraps() {
        let mut state = GameState::new();
        state.scroll_speed = 7.0;
        state.game_time = 10;
        assert_eq!(grid_offset(&state, &Settings::default()), 30.0);
        state.game_time = 0;
        assert_eq!(grid_offset(&state, &Settings::default()), 0.0);
    }

    #[test]
    fn test_reduced_motion_freezes_grid() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut a = GameState::new();
        let mut b = GameState::new();
        a.game_time = 3;
        b.game_time = 17;
        assert_eq!(grid_offset(&a, &settings), 0.0);

        let ground_row = GROUND_Y as i32 + 20;
        let fa = frame(&a, None, &settings);
        let fb = frame(&b, None, &settings);
        for x in 0..CANVAS_WIDTH as i32 {
            assert_eq!(fa.pixel(x, ground_row), fb.pixel(x, ground_row));
        }
    }

    #[test]
    fn test_game_over_overlay_dims_and_labels() {
        let mut state = GameState::new();
        state.play();
        state.end_run();
        let fb = frame(&state, None, &Settings::default());

        let [r, g, b, _] = palette::BACKGROUND;
        let dim = |c: u8| ((u32::from(c) * 102 + 127) / 255) as u8;
        assert_eq!(fb.pixel(5, 5), Some([dim(r), dim(g), dim(b), 255]));

        let title_row = CANVAS_HEIGHT as i32 / 2 - font::text_height(3) - 4;
        let lit = (0..CANVAS_WIDTH as i32)
            .filter(|&x| fb.pixel(x, title_row) == Some(palette::TEXT_ACCENT))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn test_custom_character_replaces_builtin() {
        let state = GameState::new();
        let sprite = Sprite::from_rgba(1, 1, vec![1, 2, 3, 255]).unwrap();
        let mut fb = Framebuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        draw_scene(&mut fb, &state, None, Some(&sprite), &Settings::default());
        assert_eq!(fb.pixel(PLAYER_X as i32, GROUND_Y as i32 - 1), Some([1, 2, 3, 255]));
        assert_eq!(
            fb.pixel(PLAYER_X as i32, GROUND_Y as i32 - SPRITE_DRAW_SIZE),
            Some([1, 2, 3, 255])
        );
    }
}
