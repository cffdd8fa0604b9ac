//! A playable instrument: loaded sample, negotiated device, running stream.
//!
//! Startup order is fixed: validate the config, decode the reference sample
//! (failure only downgrades to additive synthesis), open the device (failure
//! aborts), then start the stream. The stream is released when the
//! `Instrument` is dropped.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::InstrumentConfig;
use crate::device::{negotiate, AudioOutput, OutputSpec};
use crate::error::{Error, SampleLoadError};
use crate::gesture::Gesture;
use crate::graph::Engine;
use crate::sample::{load_sample, LoadedSample};
use crate::state::ToneState;
use crate::voice::{Mode, Voice};

/// Decode the configured sample, if any. Errors are logged and handed back.
pub fn load_configured_sample(config: &InstrumentConfig) -> (Option<LoadedSample>, Option<SampleLoadError>) {
    let Some(path) = config.sample_file.as_deref() else {
        return (None, None);
    };
    match load_sample(path) {
        Ok(sample) => (Some(sample), None),
        Err(e) => {
            warn!(path = %path.display(), "could not load the sound file, using additive synthesis: {e}");
            (None, Some(e))
        }
    }
}

pub struct Instrument {
    tone: Arc<ToneState>,
    mode: Mode,
    sample_error: Option<SampleLoadError>,
    output: AudioOutput,
}

impl Instrument {
    /// Bring up the instrument described by `config`.
    pub fn start(config: &InstrumentConfig) -> Result<Self, Error> {
        config.validate()?;
        let (sample, sample_error) = load_configured_sample(config);

        let target = negotiate(&OutputSpec::from(config))?;
        let tone = Arc::new(ToneState::default());
        let voice = Voice::new(sample.as_ref(), config.interpolation);
        let mode = voice.mode();
        #[allow(clippy::cast_precision_loss)]
        let engine = Engine::new(voice, Arc::clone(&tone), target.sample_rate() as f32);

        let output = AudioOutput::start(target, engine)?;
        info!(?mode, sample_rate = output.sample_rate(), "instrument ready");
        Ok(Self { tone, mode, sample_error, output })
    }

    /// A gesture mapper wired to this instrument.
    pub fn gesture(&self, config: &InstrumentConfig) -> Result<Gesture, Error> {
        Ok(Gesture::from_config(Arc::clone(&self.tone), config)?)
    }

    #[inline] pub fn set_pitch(&self, frequency: f32) { self.tone.set_pitch(frequency); }
    #[inline] pub fn set_volume(&self, volume: f32) { self.tone.set_volume(volume); }
    #[inline] pub fn play(&self) { self.tone.play(); }
    #[inline] pub fn stop(&self) { self.tone.stop(); }
    #[inline] pub fn is_playing(&self) -> bool { self.tone.is_playing() }

    #[inline] pub fn tone(&self) -> &Arc<ToneState> { &self.tone }

    /// Synthesis method in use.
    #[inline] pub fn mode(&self) -> Mode { self.mode }

    /// Why the configured sample was not used, if it wasn't.
    #[inline] pub fn sample_error(&self) -> Option<&SampleLoadError> { self.sample_error.as_ref() }

    #[inline] pub fn output(&self) -> &AudioOutput { &self.output }
}
