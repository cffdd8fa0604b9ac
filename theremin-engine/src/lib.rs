//! Theremin Engine: shared tone state, voices, and realtime glue.
//!
//! Crate layout:
//! - [`state`]      : `ToneState`, the lock-free parameter block shared with the audio thread
//! - [`graph`]      : `Generator` trait and `Engine<G>` buffer renderer
//! - [`voice`]      : additive harmonic voice, sample playback voice, `Voice` switch
//! - [`sample`]     : reference recording loader
//! - [`config`]     : `InstrumentConfig` and its validation
//! - [`gesture`]    : pointer position/press → control operations
//! - [`device`]     : CPAL output stream (feature `realtime`)
//! - [`instrument`] : startup/teardown of a playable instrument (feature `realtime`)
//!
//! The engine deliberately avoids heap allocations in the audio thread.
//! The control thread only ever touches [`ToneState`].

pub mod config;
pub mod error;
pub mod gesture;
pub mod graph;
pub mod sample;
pub mod state;
pub mod voice;

#[cfg(feature = "realtime")]
pub mod device;
#[cfg(feature = "realtime")]
pub mod instrument;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use self::config::InstrumentConfig;
pub use error::{ConfigError, Error, SampleLoadError};
pub use gesture::Gesture;
pub use graph::{Engine, Generator};
pub use sample::{load_sample, LoadedSample};
pub use state::{ToneSnapshot, ToneState};
pub use voice::{Additive, HarmonicProfile, Interpolation, Mode, SamplePlayer, Voice};

#[cfg(feature = "realtime")]
pub use error::DeviceError;
#[cfg(feature = "realtime")]
pub use instrument::Instrument;
