//! Shared tone parameters: written by the control thread, read by the audio thread.
//!
//! All three parameters live in one `AtomicU64`, so a single load yields a
//! consistent snapshot and neither side ever waits on the other:
//!
//! ```text
//!  63        49 48   47           32 31                     0
//! [  unused   ][P ][ volume (u16)  ][ frequency (f32 bits)  ]
//! ```
//!
//! Volume is stored as 16-bit fixed point over [0, 1]; that is far finer than
//! the 8-bit output it scales.

use std::sync::atomic::{AtomicU64, Ordering};

use theremin_core::dsp::clamp;
use tracing::warn;

const FREQ_MASK: u64 = 0xFFFF_FFFF;
const VOL_SHIFT: u32 = 32;
const VOL_MASK: u64 = 0xFFFF << VOL_SHIFT;
const PLAYING: u64 = 1 << 48;
const VOL_FULL: f32 = 65_535.0;

/// Frequency a fresh instrument starts at, before any pointer movement.
pub const DEFAULT_FREQUENCY: f32 = 400.0;
/// Volume a fresh instrument starts at.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// One consistent view of the parameters, taken once per audio buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToneSnapshot {
    pub frequency: f32,
    pub volume: f32,
    pub playing: bool,
}

#[inline]
fn volume_bits(volume: f32) -> u64 {
    // NaN clamps through to 0
    let v = if volume.is_nan() { 0.0 } else { clamp(volume, 0.0, 1.0) };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let q = (v * VOL_FULL).round() as u64;
    q << VOL_SHIFT
}

#[inline]
fn unpack(bits: u64) -> ToneSnapshot {
    #[allow(clippy::cast_possible_truncation)]
    let frequency = f32::from_bits((bits & FREQ_MASK) as u32);
    #[allow(clippy::cast_possible_truncation)]
    let volume = f32::from(((bits & VOL_MASK) >> VOL_SHIFT) as u16) / VOL_FULL;
    ToneSnapshot { frequency, volume, playing: bits & PLAYING != 0 }
}

/// Live instrument parameters. Share it behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct ToneState {
    bits: AtomicU64,
}

impl Default for ToneState {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY, DEFAULT_VOLUME)
    }
}

impl ToneState {
    /// Stopped state at `frequency` Hz and `volume`. An invalid frequency
    /// falls back to [`DEFAULT_FREQUENCY`].
    pub fn new(frequency: f32, volume: f32) -> Self {
        let frequency = if frequency.is_finite() && frequency > 0.0 { frequency } else { DEFAULT_FREQUENCY };
        Self { bits: AtomicU64::new(u64::from(frequency.to_bits()) | volume_bits(volume)) }
    }

    /// Store a new pitch. Only the rate of the oscillators changes; their
    /// phase is left where it is. Non-positive or non-finite values are ignored.
    pub fn set_pitch(&self, frequency: f32) {
        if !(frequency.is_finite() && frequency > 0.0) {
            warn!(frequency, "ignoring invalid pitch");
            return;
        }
        let f = u64::from(frequency.to_bits());
        self.update(|bits| (bits & !FREQ_MASK) | f);
    }

    /// Store a new volume, clamped to [0, 1].
    pub fn set_volume(&self, volume: f32) {
        let v = volume_bits(volume);
        self.update(|bits| (bits & !VOL_MASK) | v);
    }

    /// Store pitch and volume in one step, so no buffer sees one without the other.
    pub fn set_pitch_and_volume(&self, frequency: f32, volume: f32) {
        if !(frequency.is_finite() && frequency > 0.0) {
            warn!(frequency, "ignoring invalid pitch");
            return;
        }
        let fv = u64::from(frequency.to_bits()) | volume_bits(volume);
        self.update(|bits| (bits & !(FREQ_MASK | VOL_MASK)) | fv);
    }

    /// Start sounding from the next buffer on.
    #[inline]
    pub fn play(&self) {
        self.bits.fetch_or(PLAYING, Ordering::AcqRel);
    }

    /// Silence from the next buffer on. There is no fade-out.
    #[inline]
    pub fn stop(&self) {
        self.bits.fetch_and(!PLAYING, Ordering::AcqRel);
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.bits.load(Ordering::Acquire) & PLAYING != 0
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.snapshot().frequency
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.snapshot().volume
    }

    /// All parameters at one point in time. Wait-free.
    #[inline]
    pub fn snapshot(&self) -> ToneSnapshot {
        unpack(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    fn update(&self, f: impl Fn(u64) -> u64) {
        // the closure never returns None, so this cannot fail
        let _ = self.bits.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| Some(f(bits)));
    }
}
