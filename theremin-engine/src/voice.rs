//! The two instrument voices and the runtime switch between them.
//!
//! - `Additive`     : four cosine harmonics on free-running phase accumulators
//! - `SamplePlayer` : the 440 Hz reference recording, read at a pitch-dependent speed
//! - `Voice`        : whichever of the two the instrument was built with
//!
//! Both produce levels in signed 8-bit units; [`Engine`](crate::graph::Engine)
//! adds the 128 offset. Parameters are latched in `prepare`, once per buffer.

use std::sync::Arc;

use theremin_core::dsp::{clamp, cos, lerp, wrap_phase, TAU};

use crate::graph::Generator;
use crate::sample::{LoadedSample, REFERENCE_HZ};
use crate::state::ToneSnapshot;

/// Scale applied to full-range 16-bit samples, in 8-bit units.
pub const SAMPLE_HEADROOM: f32 = 120.0;

// -------------------------------- Additive voice ---------------------------------

/// Relative weights of harmonics 1–4, in 8-bit units. Their sum is the peak
/// level at full volume and must stay below 128.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HarmonicProfile(pub [f32; 4]);

impl HarmonicProfile {
    /// Equal weights; peaks at ±100 around the silence value.
    pub const REFERENCE: Self = Self([25.0; 4]);

    #[inline]
    pub fn headroom(&self) -> f32 {
        self.0.iter().sum()
    }
}

impl Default for HarmonicProfile {
    fn default() -> Self { Self::REFERENCE }
}

/// Additive synthesis over four harmonics.
///
/// Phases are never reset by a pitch change, only their increment changes,
/// so gliding the pitch does not click.
#[derive(Copy, Clone, Debug)]
pub struct Additive {
    sr: f32,
    profile: HarmonicProfile,
    phases: [f32; 4],   // radians, [0, 2π)
    quotient: f32,      // fundamental increment per sample
    volume: f32,
}

impl Additive {
    #[inline]
    pub fn new(profile: HarmonicProfile) -> Self {
        Self { sr: 16_000.0, profile, phases: [0.0; 4], quotient: 0.0, volume: 0.0 }
    }

    /// Current phase of each harmonic, in radians.
    #[inline] pub fn phases(&self) -> [f32; 4] { self.phases }

    /// Fundamental phase increment latched for the current buffer.
    #[inline] pub fn quotient(&self) -> f32 { self.quotient }

    #[inline] pub fn profile(&self) -> HarmonicProfile { self.profile }
}

impl Generator for Additive {
    #[inline]
    fn reset(&mut self, sr: f32) {
        self.sr = sr.max(1.0);
    }

    #[inline]
    fn prepare(&mut self, tone: &ToneSnapshot) {
        self.quotient = TAU * tone.frequency / self.sr;
        self.volume = clamp(tone.volume, 0.0, 1.0);
    }

    #[inline]
    fn next(&mut self) -> f32 {
        let mut acc = 0.0;
        let mut mult = 1.0;
        for (phase, weight) in self.phases.iter_mut().zip(self.profile.0.iter()) {
            *phase = wrap_phase(*phase + mult * self.quotient);
            acc += cos(*phase) * weight;
            mult += 1.0;
        }
        self.volume * acc
    }
}

// ------------------------------ Sample playback voice ----------------------------

/// How the reference recording is read between stored samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Round the cursor to the closest stored sample.
    Nearest,
    /// Blend the two stored samples around the cursor.
    #[default]
    Linear,
}

/// Loops the reference recording, sped up or slowed down to the requested pitch.
///
/// The cursor wraps modulo `len - 1` and is left untouched while stopped,
/// so playback resumes where it paused.
#[derive(Clone, Debug)]
pub struct SamplePlayer {
    data: Arc<[i16]>,
    file_rate: f32,
    interpolation: Interpolation,
    span: f64,        // len - 1
    rate_ratio: f64,  // file_rate / sr
    cursor: f64,
    speed: f64,
    volume: f32,
}

impl SamplePlayer {
    pub fn new(sample: &LoadedSample, interpolation: Interpolation) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let span = (sample.len() - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let file_rate = sample.sample_rate().max(1) as f32;
        Self {
            data: Arc::clone(sample.data()),
            file_rate,
            interpolation,
            span,
            rate_ratio: 1.0,
            cursor: 0.0,
            speed: 0.0,
            volume: 0.0,
        }
    }

    /// Read position in stored samples, in `[0, len - 1)`.
    #[inline] pub fn cursor(&self) -> f64 { self.cursor }

    /// Move the read position; wrapped into `[0, len - 1)`.
    #[inline]
    pub fn set_cursor(&mut self, cursor: f64) {
        self.cursor = if cursor.is_finite() { cursor.rem_euclid(self.span) } else { 0.0 };
    }

    /// Cursor advance per output frame latched for the current buffer.
    #[inline] pub fn speed(&self) -> f64 { self.speed }

    #[inline] pub fn interpolation(&self) -> Interpolation { self.interpolation }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn read(&self) -> f32 {
        match self.interpolation {
            Interpolation::Nearest => {
                // cursor < span, so the rounded index is at most len - 1
                f32::from(self.data[self.cursor.round() as usize])
            }
            Interpolation::Linear => {
                let i = self.cursor as usize;
                let frac = (self.cursor - self.cursor.floor()) as f32;
                let a = f32::from(self.data[i]);
                let b = f32::from(self.data[(i + 1).min(self.data.len() - 1)]);
                lerp(a, b, frac)
            }
        }
    }
}

impl Generator for SamplePlayer {
    #[inline]
    fn reset(&mut self, sr: f32) {
        self.rate_ratio = f64::from(self.file_rate) / f64::from(sr.max(1.0));
    }

    #[inline]
    fn prepare(&mut self, tone: &ToneSnapshot) {
        self.speed = f64::from(tone.frequency / REFERENCE_HZ) * self.rate_ratio;
        self.volume = clamp(tone.volume, 0.0, 1.0);
    }

    #[inline]
    fn next(&mut self) -> f32 {
        let s = self.read();
        self.cursor = (self.cursor + self.speed).rem_euclid(self.span);
        self.volume * s / 32_768.0 * SAMPLE_HEADROOM
    }
}

// ------------------------------------- Voice -------------------------------------

/// Which synthesis method a [`Voice`] uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Harmonic,
    Sample,
}

/// The instrument's voice, chosen once at construction.
#[derive(Clone, Debug)]
pub enum Voice {
    Harmonic(Additive),
    Sample(SamplePlayer),
}

impl Voice {
    /// Sample playback if a recording is given, additive synthesis otherwise.
    pub fn new(sample: Option<&LoadedSample>, interpolation: Interpolation) -> Self {
        match sample {
            Some(s) => Voice::Sample(SamplePlayer::new(s, interpolation)),
            None => Voice::Harmonic(Additive::new(HarmonicProfile::REFERENCE)),
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        match self {
            Voice::Harmonic(_) => Mode::Harmonic,
            Voice::Sample(_) => Mode::Sample,
        }
    }
}

impl Generator for Voice {
    #[inline]
    fn reset(&mut self, sr: f32) {
        match self {
            Voice::Harmonic(v) => v.reset(sr),
            Voice::Sample(v) => v.reset(sr),
        }
    }

    #[inline]
    fn prepare(&mut self, tone: &ToneSnapshot) {
        match self {
            Voice::Harmonic(v) => v.prepare(tone),
            Voice::Sample(v) => v.prepare(tone),
        }
    }

    #[inline]
    fn next(&mut self) -> f32 {
        match self {
            Voice::Harmonic(v) => v.next(),
            Voice::Sample(v) => v.next(),
        }
    }
}
