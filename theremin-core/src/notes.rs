//! Note naming and key shading.
//!
//! Frequencies are labelled relative to A4 = 440 Hz with the chromatic
//! sequence starting at A, so octave numbers roll over between G# and A
//! (`G#4` is followed by `A5`). Octaves below zero use floor division:
//! the semitone just under `A0` is `G#-1`.

use core::fmt;

use num_traits::{Float, ToPrimitive};

use crate::error::PitchError;
use crate::pitch::to_f64;

/// Reference tuning for the label computation.
pub const A4_HZ: f64 = 440.0;

/// One of the 12 semitone names, in the order used for labelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PitchClass { A, ASharp, B, C, CSharp, D, DSharp, E, F, FSharp, G, GSharp }

/// Chromatic sequence starting at A.
pub const CHROMATIC: [PitchClass; 12] = [
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
];

impl PitchClass {
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
        }
    }

    #[inline]
    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            PitchClass::ASharp
                | PitchClass::CSharp
                | PitchClass::DSharp
                | PitchClass::FSharp
                | PitchClass::GSharp
        )
    }
}

/// A labelled pitch: class plus octave number. Displays as e.g. `A4`, `C#3`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Note {
    pub class: PitchClass,
    pub octave: i64,
}

impl Note {
    /// Note for semitone index `n`, where `n = 48` is A4.
    #[inline]
    pub fn from_index(n: i64) -> Self {
        // rem_euclid is always in 0..12
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let class = CHROMATIC[n.rem_euclid(12) as usize];
        Self { class, octave: n.div_euclid(12) }
    }

    #[inline]
    pub fn shade(&self) -> KeyShade {
        KeyShade::of(self.class)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.name(), self.octave)
    }
}

/// Semitone index of `frequency`: `round(12·log2(f/440) + 49) − 1`.
pub fn semitone_index<T: Float>(frequency: T) -> Result<i64, PitchError> {
    let f = to_f64(frequency);
    if !(f.is_finite() && f > 0.0) {
        return Err(PitchError::InvalidFrequency(f));
    }
    let n = (12.0 * (f / A4_HZ).log2() + 49.0).round() - 1.0;
    n.to_i64().ok_or(PitchError::InvalidFrequency(f))
}

/// Label the nearest semitone to `frequency`.
pub fn frequency_to_note<T: Float>(frequency: T) -> Result<Note, PitchError> {
    semitone_index(frequency).map(Note::from_index)
}

// ----------------------------------- Shading -------------------------------------

/// Background classification of a key, as drawn behind the pitch axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyShade {
    /// Sharps: black keys.
    Sharp,
    /// E and B: naturals without a sharp above them.
    EdgeNatural,
    /// All other naturals.
    Natural,
}

impl KeyShade {
    #[inline]
    pub fn of(class: PitchClass) -> Self {
        match class {
            c if c.is_sharp() => KeyShade::Sharp,
            PitchClass::E | PitchClass::B => KeyShade::EdgeNatural,
            _ => KeyShade::Natural,
        }
    }

    /// Gray level (0 = black, 255 = white).
    #[inline]
    pub fn gray(self) -> u8 {
        match self {
            KeyShade::Sharp => 0,
            KeyShade::EdgeNatural => 200,
            KeyShade::Natural => 255,
        }
    }
}

/// Classify a note label such as `"F#3"` or `"E5"`.
pub fn key_shade(label: &str) -> KeyShade {
    let mut chars = label.chars();
    let first = chars.next();
    if chars.next() == Some('#') {
        KeyShade::Sharp
    } else if matches!(first, Some('E' | 'B')) {
        KeyShade::EdgeNatural
    } else {
        KeyShade::Natural
    }
}

/// Shade of the key nearest to `frequency`.
pub fn frequency_to_shade<T: Float>(frequency: T) -> Result<KeyShade, PitchError> {
    frequency_to_note(frequency).map(|n| n.shade())
}
