//! Game settings and tuning
//!
//! Read once at startup from an optional JSON document. Nothing is written back.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Gameplay tuning constants
///
/// Defaults reproduce the reference feel; change them and the game plays differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Mean bass magnitude (0-255) that triggers an obstacle
    pub bass_threshold: f32,
    /// Mean treble magnitude (0-255) that triggers a coin
    pub treble_threshold: f32,
    /// Frames between two obstacle spawns
    pub bass_cooldown: u32,
    /// Frames between two coin spawns
    pub treble_cooldown: u32,
    /// Scroll speed at silence, px/frame
    pub min_scroll_speed: f32,
    /// Extra scroll speed at full volume, px/frame
    pub scroll_speed_range: f32,
    /// Points per coin
    pub coin_value: u32,
    /// One passive point every this many frames
    pub passive_interval: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bass_threshold: 155.0,
            treble_threshold: 100.0,
            bass_cooldown: 25,
            treble_cooldown: 15,
            min_scroll_speed: 3.0,
            scroll_speed_range: 4.0,
            coin_value: 50,
            passive_interval: 10,
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=255.0).contains(&self.bass_threshold),
            "bass_threshold {} outside 0..=255",
            self.bass_threshold
        );
        ensure!(
            (0.0..=255.0).contains(&self.treble_threshold),
            "treble_threshold {} outside 0..=255",
            self.treble_threshold
        );
        ensure!(self.passive_interval > 0, "passive_interval must be at least 1");
        ensure!(
            self.min_scroll_speed.is_finite() && self.min_scroll_speed >= 0.0,
            "min_scroll_speed must be a non-negative number"
        );
        ensure!(
            self.scroll_speed_range.is_finite() && self.scroll_speed_range >= 0.0,
            "scroll_speed_range must be a non-negative number"
        );
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Spectrum bars behind the playfield
    pub spectrum_bars: bool,
    /// Scrolling grid on the ground band
    pub ground_grid: bool,

    // === Accessibility ===
    /// Reduced motion (ground grid stops scrolling)
    pub reduced_motion: bool,

    // === Gameplay ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spectrum_bars: true,
            ground_grid: true,
            reduced_motion: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Id of the inline JSON element the web host reads settings from
    pub const ELEMENT_ID: &'static str = "beat-runner-settings";

    /// Parse and validate settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("malformed settings JSON")?;
        settings.tuning.validate().context("invalid tuning")?;
        Ok(settings)
    }

    /// Parse settings, falling back to defaults on any problem
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.map(str::trim).filter(|s| !s.is_empty()) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings ({e:#}), using defaults");
                Self::default()
            }
        }
    }

    /// Effective ground grid scroll (respects reduced_motion)
    pub fn effective_grid_scroll(&self) -> bool {
        self.ground_grid && !self.reduced_motion
    }

    /// Load settings from the inline JSON element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());
        Self::from_json_or_default(json.as_deref())
    }

    /// Load settings from the file named by `BEAT_RUNNER_SETTINGS` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let json = std::env::var("BEAT_RUNNER_SETTINGS")
            .ok()
            .and_then(|path| match std::fs::read_to_string(&path) {
                Ok(json) => Some(json),
                Err(e) => {
                    log::warn!("Could not read settings file {path}: {e}");
                    None
                }
            });
        Self::from_json_or_default(json.as_deref())
    }
}
