//! Game session
//!
//! Owns the state for one session and runs one simulation step plus one
//! render per display frame. Hosts drive it with play/pause/jump and a
//! spectrum snapshot per frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::renderer::{Framebuffer, Sprite, draw_scene};
use crate::settings::Settings;
use crate::sim::{AudioFeatures, GameEvent, GameState, SpectrumSource, TickReport, tick};

/// One play session
pub struct Game<R: Rng = Pcg32> {
    state: GameState,
    settings: Settings,
    rng: R,
    framebuffer: Framebuffer,
    character: Option<Sprite>,
}

impl Game<Pcg32> {
    /// New session with an unpredictable coin-lane sequence
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, Pcg32::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> Game<R> {
    /// New session with a caller-supplied random source
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        Self {
            state: GameState::new(),
            settings,
            rng,
            framebuffer: Framebuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            character: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Last rendered frame
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Playback started (fresh start, restart after game over, or resume)
    pub fn play(&mut self) {
        self.state.play();
    }

    /// Playback paused or ended
    pub fn pause(&mut self) {
        self.state.pause();
    }

    /// Jump intent from any input device
    pub fn jump(&mut self) {
        self.state.jump();
    }

    /// Swap the character art; takes effect on the next frame, state untouched
    pub fn set_character(&mut self, character: Option<Sprite>) {
        match &character {
            Some(sprite) => log::info!("Character image set ({}x{})", sprite.width(), sprite.height()),
            None => log::info!("Using built-in character"),
        }
        self.character = character;
    }

    /// Run one display frame
    ///
    /// `spectrum` is this frame's snapshot, or `None` when nothing is
    /// playing. Without a snapshot the simulation holds still and only the
    /// static scene is drawn. The snapshot is not kept past this call.
    pub fn frame(&mut self, spectrum: Option<&[u8]>) -> TickReport {
        let report = match spectrum {
            Some(bins) => {
                let features = AudioFeatures::from_bins(bins);
                tick(&mut self.state, &features, &self.settings.tuning, &mut self.rng)
            }
            None => TickReport::default(),
        };

        draw_scene(
            &mut self.framebuffer,
            &self.state,
            spectrum,
            self.character.as_ref(),
            &self.settings,
        );

        report
    }

    /// Run one display frame reading from a spectrum source
    ///
    /// A snapshot whose length disagrees with the source's bin count is
    /// treated as no snapshot.
    pub fn frame_from<S: SpectrumSource + ?Sized>(&mut self, source: Option<&mut S>) -> TickReport {
        match source {
            Some(source) if source.is_playing() => {
                let expected = source.bin_count();
                let bins = source.snapshot();
                if bins.len() == expected {
                    self.frame(Some(bins))
                } else {
                    log::warn!("Dropping spectrum snapshot: {} bins, expected {}", bins.len(), expected);
                    self.frame(None)
                }
            }
            _ => self.frame(None),
        }
    }

    /// Take the notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}

/// Character change requested while no session exists yet
///
/// Only the latest request is kept; `apply` hands it to the session once
/// one is created.
#[derive(Debug, Default)]
pub struct PendingCharacter(Option<Option<Sprite>>);

impl PendingCharacter {
    /// Swap the character on `game` now, or hold it when there is no game
    pub fn request<R: Rng>(&mut self, character: Option<Sprite>, game: Option<&mut Game<R>>) {
        match game {
            Some(game) => game.set_character(character),
            None => self.0 = Some(character),
        }
    }

    pub fn apply<R: Rng>(&mut self, game: &mut Game<R>) {
        if let Some(character) = self.0.take() {
            log::debug!("Applying character requested before startup");
            game.set_character(character);
        }
    }
}
