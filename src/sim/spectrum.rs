//! Spectrum feature extraction
//!
//! Turns one frame's byte-magnitude spectrum into the three scalars that drive
//! the game: bass energy, treble energy, and overall volume.

use crate::consts::{BASS_PERCENT, TREBLE_START_PERCENT};

/// Anything that can hand the game one spectrum snapshot per frame
///
/// Bins are ordered low to high frequency, each 0-255. The returned slice is
/// only valid for the current frame; the source is free to overwrite it.
pub trait SpectrumSource {
    /// Number of bins in every snapshot
    fn bin_count(&self) -> usize;
    /// Whether the transport is currently playing
    fn is_playing(&self) -> bool;
    /// Latest magnitudes, `bin_count()` long
    fn snapshot(&mut self) -> &[u8];
}

/// Per-frame audio features
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioFeatures {
    /// Mean magnitude of the lowest 15% of bins (0-255)
    pub bass: f32,
    /// Mean magnitude of the highest 30% of bins (0-255)
    pub treble: f32,
    /// Mean magnitude of all bins, normalized to [0, 1]
    pub volume: f32,
}

impl AudioFeatures {
    /// Features of silence (also used when no source is attached)
    pub const SILENT: Self = Self {
        bass: 0.0,
        treble: 0.0,
        volume: 0.0,
    };

    /// Extract features from a spectrum snapshot
    pub fn from_bins(bins: &[u8]) -> Self {
        let n = bins.len();
        if n == 0 {
            return Self::SILENT;
        }

        // Integer math keeps the band edges exact floors
        let bass_end = n * BASS_PERCENT / 100;
        let treble_start = n * TREBLE_START_PERCENT / 100;

        Self {
            bass: mean(&bins[..bass_end]),
            treble: mean(&bins[treble_start..]),
            volume: mean(bins) / 255.0,
        }
    }
}

/// Deterministic drum-machine spectrum for headless runs
///
/// A kick every `KICK_EVERY` frames floods the bass band, a hat every
/// `HAT_EVERY` frames lights the treble band, and a quiet pad fills the rest.
pub struct SyntheticTrack {
    frame: u64,
    bins: Vec<u8>,
}

impl SyntheticTrack {
    pub const KICK_EVERY: u64 = 32;
    pub const HAT_EVERY: u64 = 12;

    pub fn new(bin_count: usize) -> Self {
        Self {
            frame: 0,
            bins: vec![0; bin_count],
        }
    }

    fn fill(&mut self) {
        let n = self.bins.len();
        let bass_end = n * BASS_PERCENT / 100;
        let treble_start = n * TREBLE_START_PERCENT / 100;
        let kick = self.frame % Self::KICK_EVERY < 3;
        let hat = self.frame % Self::HAT_EVERY < 2;

        for (i, bin) in self.bins.iter_mut().enumerate() {
            *bin = if i < bass_end {
                if kick { 230 } else { 60 }
            } else if i >= treble_start {
                if hat { 160 } else { 20 }
            } else {
                // Slow swell so the scroll speed moves
                (40 + (self.frame / 4 + i as u64) % 48) as u8
            };
        }
    }
}

impl SpectrumSource for SyntheticTrack {
    fn bin_count(&self) -> usize {
        self.bins.len()
    }

    fn is_playing(&self) -> bool {
        true
    }

    fn snapshot(&mut self) -> &[u8] {
        self.fill();
        self.frame += 1;
        &self.bins
    }
}

/// Mean of a byte slice; empty slices average to zero
fn mean(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| u32::from(b)).sum();
    sum as f32 / bins.len() as f32
}
