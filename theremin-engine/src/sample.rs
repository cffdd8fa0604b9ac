//! Reference-tone loading.
//!
//! The recording is a mono, 16-bit signed PCM WAV of a 440 Hz tone. It is
//! decoded eagerly, once, before any audio stream opens; the audio thread
//! only ever reads the resulting buffer.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use hound::{SampleFormat, WavReader};
use tracing::info;

use crate::error::SampleLoadError;

/// Pitch the reference recording is tuned to.
pub const REFERENCE_HZ: f32 = 440.0;

/// Decoded reference recording. Cheap to clone; the samples are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSample {
    data: Arc<[i16]>,
    sample_rate: u32,
}

impl LoadedSample {
    /// Wrap already-decoded samples. At least two samples are required.
    pub fn new(data: impl Into<Arc<[i16]>>, sample_rate: u32) -> Result<Self, SampleLoadError> {
        let data = data.into();
        if data.len() < 2 {
            return Err(SampleLoadError::TooShort(data.len()));
        }
        Ok(Self { data, sample_rate })
    }

    #[inline] pub fn data(&self) -> &Arc<[i16]> { &self.data }
    #[inline] pub fn len(&self) -> usize { self.data.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.data.is_empty() }
    #[inline] pub fn sample_rate(&self) -> u32 { self.sample_rate }
}

/// Load the reference recording from `path`.
pub fn load_sample(path: &Path) -> Result<LoadedSample, SampleLoadError> {
    let file = File::open(path)?;
    let sample = read_sample(BufReader::new(file))?;
    info!(
        path = %path.display(),
        frames = sample.len(),
        sample_rate = sample.sample_rate(),
        "loaded reference sample"
    );
    Ok(sample)
}

/// Decode a WAV stream into a [`LoadedSample`].
pub fn read_sample<R: Read>(reader: R) -> Result<LoadedSample, SampleLoadError> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(SampleLoadError::Channels(spec.channels));
    }
    if spec.sample_format != SampleFormat::Int {
        return Err(SampleLoadError::Format);
    }
    if spec.bits_per_sample != 16 {
        return Err(SampleLoadError::BitDepth(spec.bits_per_sample));
    }
    let data = reader.into_samples::<i16>().collect::<Result<Vec<i16>, _>>()?;
    LoadedSample::new(data, spec.sample_rate)
}
