//! Pointer gestures → control operations.
//!
//! Horizontal position picks the pitch along the [`PitchAxis`], vertical
//! position the volume (top = loudest). Pressing starts the tone, releasing
//! stops it. Moves that land outside the pitch range or the window are
//! ignored rather than clamped.

use std::fmt::Write as _;
use std::sync::Arc;

use theremin_core::notes::frequency_to_note;
use theremin_core::pitch::PitchAxis;

use crate::config::InstrumentConfig;
use crate::error::ConfigError;
use crate::state::ToneState;

/// Control-thread side of the instrument.
#[derive(Debug, Clone)]
pub struct Gesture {
    tone: Arc<ToneState>,
    axis: PitchAxis<f64>,
    height: f64,
    pitch: f64,
    volume: f64,
}

impl Gesture {
    pub fn new(tone: Arc<ToneState>, axis: PitchAxis<f64>, height: f64) -> Self {
        Self { tone, axis, height: height.max(1.0), pitch: 0.0, volume: 0.0 }
    }

    /// Build from the configured window and pitch range.
    pub fn from_config(tone: Arc<ToneState>, config: &InstrumentConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(tone, config.pitch_axis()?, f64::from(config.window_height)))
    }

    #[inline] pub fn axis(&self) -> &PitchAxis<f64> { &self.axis }

    /// Pitch of the last accepted move, 0 before any.
    #[inline] pub fn pitch(&self) -> f64 { self.pitch }

    /// Volume of the last accepted move, 0 before any.
    #[inline] pub fn volume(&self) -> f64 { self.volume }

    /// Pointer moved to `(x, y)`. Returns whether the tone was updated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        let pitch = self.axis.axis_to_frequency(x);
        let volume = 1.0 - y / self.height;

        if !self.axis.contains(pitch) || !(0.0..=1.0).contains(&volume) {
            return false;
        }
        self.pitch = pitch;
        self.volume = volume;
        self.tone.set_pitch_and_volume(pitch as f32, volume as f32);
        true
    }

    #[inline]
    pub fn pointer_pressed(&self) {
        self.tone.play();
    }

    #[inline]
    pub fn pointer_released(&self) {
        self.tone.stop();
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.tone.is_playing()
    }

    /// Two-line status text: frequency, then note label.
    pub fn readout(&self) -> String {
        let mut s = String::new();
        let _ = write!(s, "{:.2} Hz", self.pitch);
        if let Ok(note) = frequency_to_note(self.pitch) {
            let _ = write!(s, "\n{note}");
        }
        s
    }

    /// Gray level of every column of the playing surface, left to right.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn key_shades(&self) -> Vec<u8> {
        let width = self.axis.length() as usize;
        (0..width)
            .map(|x| {
                #[allow(clippy::cast_precision_loss)]
                let f = self.axis.axis_to_frequency(x as f64);
                frequency_to_note(f).map_or(255, |n| n.shade().gray())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theremin_core::pitch::Scale;

    fn gesture(scale: Scale) -> (Arc<ToneState>, Gesture) {
        let tone = Arc::new(ToneState::default());
        let axis = PitchAxis::new(500.0, 3000.0, 800.0, scale).unwrap();
        (Arc::clone(&tone), Gesture::new(tone, axis, 600.0))
    }

    #[test]
    fn move_sets_pitch_and_volume() {
        let (tone, mut g) = gesture(Scale::Linear);
        assert!(g.pointer_moved(400.0, 150.0));
        let snap = tone.snapshot();
        assert_eq!(snap.frequency, 1750.0);
        assert!((snap.volume - 0.75).abs() < 1e-4);
        assert!(!snap.playing);
    }

    #[test]
    fn out_of_range_moves_are_ignored() {
        let (tone, mut g) = gesture(Scale::Linear);
        assert!(g.pointer_moved(0.0, 0.0));
        let before = tone.snapshot();
        assert!(!g.pointer_moved(-10.0, 100.0));
        assert!(!g.pointer_moved(900.0, 100.0));
        assert!(!g.pointer_moved(100.0, 700.0));
        assert!(!g.pointer_moved(100.0, -1.0));
        assert_eq!(tone.snapshot(), before);
    }

    #[test]
    fn press_and_release_toggle_playing() {
        let (tone, g) = gesture(Scale::Logarithmic);
        g.pointer_pressed();
        assert!(tone.is_playing());
        assert!(g.is_playing());
        g.pointer_released();
        assert!(!tone.is_playing());
    }

    #[test]
    fn readout_shows_hz_and_note() {
        let tone = Arc::new(ToneState::default());
        let axis = PitchAxis::new(220.0, 880.0, 200.0, Scale::Logarithmic).unwrap();
        let mut g = Gesture::new(tone, axis, 100.0);
        g.pointer_moved(100.0, 50.0);
        assert_eq!(g.readout(), "440.00 Hz\nA4");
    }

    #[test]
    fn readout_keeps_last_accepted_pitch() {
        let (_, mut g) = gesture(Scale::Linear);
        assert_eq!(g.readout(), "0.00 Hz");
        assert!(g.pointer_moved(400.0, 150.0));
        assert!(!g.pointer_moved(900.0, 150.0));
        assert!(!g.pointer_moved(400.0, 700.0));
        assert_eq!(g.pitch(), 1750.0);
        assert!((g.volume() - 0.75).abs() < 1e-12);
        g.pointer_pressed();
        assert_eq!(g.readout(), "1750.00 Hz\nA6");
    }

    #[test]
    fn shades_cover_every_column() {
        let (_, g) = gesture(Scale::Logarithmic);
        let shades = g.key_shades();
        assert_eq!(shades.len(), 800);
        // first column is 500 Hz, nearest to B4
        assert_eq!(shades[0], 200);
        assert!(shades.iter().all(|&s| s == 0 || s == 200 || s == 255));
        assert!(shades.contains(&0));
        assert!(shades.contains(&255));
    }

    #[test]
    fn from_config_uses_window() {
        let tone = Arc::new(ToneState::default());
        let config = InstrumentConfig { window_height: 100, ..InstrumentConfig::default() };
        let mut g = Gesture::from_config(tone, &config).unwrap();
        assert!(g.pointer_moved(0.0, 25.0));
        assert!((g.volume() - 0.75).abs() < 1e-12);
        assert!((g.pitch() - 500.0).abs() < 1e-9);
    }
}
