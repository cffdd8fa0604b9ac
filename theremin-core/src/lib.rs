#![cfg_attr(not(feature = "std"), no_std)]
//! Theremin Core: pitch-axis mapping, note naming and DSP helpers.
//!
//! Features
//! - `std`       : (default) use the Rust standard library
//! - `no-std`    : build with `#![no_std]` and use the `libm` math backend
//! - `fast-math` : polynomial cosine for the synthesis hot path
//! - `serde`     : deserialize [`pitch::Scale`] from configuration
//!
//! Modules
//! - [`dsp`]   : math backend, phase wrapping, 8-bit PCM conversion
//! - [`pitch`] : control-axis position ↔ frequency (linear / logarithmic)
//! - [`notes`] : frequency → note label, key shading for the axis background
//!
//! Design
//! - No heap allocations; everything here is pure
//! - Conversions that have preconditions return [`PitchError`]

pub mod dsp;
pub mod error;
pub mod notes;
pub mod pitch;

pub use error::PitchError;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{clamp, cos, level_to_u8, lerp, wrap_phase, SILENCE_U8, TAU};
    pub use crate::error::PitchError;
    pub use crate::notes::{frequency_to_note, frequency_to_shade, key_shade, KeyShade, Note, PitchClass};
    pub use crate::pitch::{axis_to_frequency, frequency_to_axis, PitchAxis, Scale};
}

#[cfg(test)]
mod smoke {

    #[test]
    fn prelude_exists() {
        use crate::prelude::*;
        let axis = PitchAxis::new(500.0, 3000.0, 800.0, Scale::Linear).unwrap();
        let f = axis_to_frequency(0.0, &axis);
        let note = frequency_to_note(f).unwrap();
        let _ = key_shade(&note.to_string());
        assert_eq!(level_to_u8(0.0), SILENCE_U8);
    }
}
