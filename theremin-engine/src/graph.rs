//! Realtime synthesis core.
//!
//! This module defines the minimal `Generator` trait and a lightweight `Engine<G>`
//! wrapper that owns a generator (voice), reads the shared [`ToneState`] once per
//! buffer, and fills unsigned 8-bit mono buffers with zero heap work.
//!
//! Design goals
//! - No allocations, locks, I/O or logging inside `render`
//! - One parameter snapshot per buffer, never re-read per sample
//! - Generic over the voice type, so voices can be swapped without trait objects

use std::sync::Arc;

use theremin_core::dsp::{level_to_u8, SILENCE_U8};

use crate::state::{ToneSnapshot, ToneState};

/// Anything that can generate one sample at a time.
pub trait Generator {
    /// Called when the engine is (re)initialized or when the sample rate changes.
    fn reset(&mut self, sr: f32);

    /// Latch the parameters for the coming buffer. Only called while playing.
    fn prepare(&mut self, tone: &ToneSnapshot);

    /// Next sample as a signed level in 8-bit units (0 = silence).
    fn next(&mut self) -> f32;
}

/// Lightweight realtime engine that owns a generator.
///
/// The audio callback calls [`render`](Engine::render) with the buffer it must
/// fill; every element is written exactly once.
pub struct Engine<G: Generator> {
    sr: f32,
    tone: Arc<ToneState>,
    gen: G,
}

impl<G: Generator> Engine<G> {
    /// Construct with an already-configured generator. We immediately `reset`
    /// the generator to communicate the sample rate.
    #[inline]
    pub fn new(mut gen: G, tone: Arc<ToneState>, sr: f32) -> Self {
        let sr = sr.max(1.0);
        gen.reset(sr);
        Self { sr, tone, gen }
    }

    /// Fill `out` with the next `out.len()` frames.
    ///
    /// While stopped every frame is [`SILENCE_U8`] and the generator is not
    /// advanced, so phase and playback position survive a stop/play cycle.
    #[inline]
    pub fn render(&mut self, out: &mut [u8]) {
        let tone = self.tone.snapshot();
        if !tone.playing {
            out.fill(SILENCE_U8);
            return;
        }
        self.gen.prepare(&tone);
        for s in out.iter_mut() {
            *s = level_to_u8(self.gen.next());
        }
    }

    /// Change the sample rate; the generator is `reset` only if it differs.
    #[inline]
    pub fn set_sample_rate(&mut self, sr: f32) {
        let sr = sr.max(1.0);
        if sr != self.sr {
            self.sr = sr;
            self.gen.reset(sr);
        }
    }

    /// Return the engine’s current sample rate.
    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }

    /// The shared parameter block this engine reads from.
    #[inline] pub fn tone(&self) -> &Arc<ToneState> { &self.tone }

    /// Replace the inner generator in a zero-allocation manner.
    /// We call `reset(sr)` on the new voice.
    #[inline]
    pub fn swap_generator(&mut self, mut new_gen: G) {
        new_gen.reset(self.sr);
        self.gen = new_gen;
    }

    #[inline] pub fn generator(&self) -> &G { &self.gen }

    #[inline] pub fn generator_mut(&mut self) -> &mut G { &mut self.gen }
}
