//! Audio analysis using the Web Audio API
//!
//! Taps a page `<audio>` element through an analyser node so the game can
//! read one frequency snapshot per frame. Playback itself stays with the
//! element; this side only listens.

use anyhow::{Result, anyhow};
use web_sys::{AnalyserNode, AudioContext, HtmlMediaElement, MediaElementAudioSourceNode};

use crate::sim::SpectrumSource;

/// Analyser FFT size; yields half as many frequency bins
pub const FFT_SIZE: u32 = 256;

/// Live spectrum of a media element
pub struct WebAudioSpectrum {
    ctx: AudioContext,
    element: HtmlMediaElement,
    analyser: AnalyserNode,
    // Kept so the graph stays connected for the element's lifetime
    _source: MediaElementAudioSourceNode,
    bins: Vec<u8>,
}

impl WebAudioSpectrum {
    /// Route `element` through an analyser to the speakers
    ///
    /// An element can only be attached once per page.
    pub fn attach(element: &HtmlMediaElement) -> Result<Self> {
        let ctx = AudioContext::new().map_err(|e| anyhow!("failed to create AudioContext: {e:?}"))?;
        let source = ctx
            .create_media_element_source(element)
            .map_err(|e| anyhow!("failed to tap media element: {e:?}"))?;
        let analyser = ctx
            .create_analyser()
            .map_err(|e| anyhow!("failed to create analyser: {e:?}"))?;
        analyser.set_fft_size(FFT_SIZE);

        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| anyhow!("failed to connect source: {e:?}"))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow!("failed to connect analyser: {e:?}"))?;

        let bins = vec![0u8; analyser.frequency_bin_count() as usize];
        log::info!("Audio analyser attached ({} bins)", bins.len());

        Ok(Self {
            ctx,
            element: element.clone(),
            analyser,
            _source: source,
            bins,
        })
    }

    /// Resume the context (required after a user gesture)
    pub fn resume(&self) {
        if self.ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }
}

impl SpectrumSource for WebAudioSpectrum {
    fn bin_count(&self) -> usize {
        self.bins.len()
    }

    fn is_playing(&self) -> bool {
        !self.element.paused() && !self.element.ended()
    }

    fn snapshot(&mut self) -> &[u8] {
        self.analyser.get_byte_frequency_data(&mut self.bins);
        &self.bins
    }
}
