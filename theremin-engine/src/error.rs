//! Error types.

use thiserror::Error;

pub use theremin_core::PitchError;

/// Why the reference sample could not be used. Never fatal: the instrument
/// falls back to additive synthesis.
#[derive(Error, Debug)]
pub enum SampleLoadError {
    /// IO error opening or reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed WAV container.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Not mono.
    #[error("expected a mono recording, found {0} channels")]
    Channels(u16),

    /// Not 16-bit.
    #[error("expected 16-bit samples, found {0}-bit")]
    BitDepth(u16),

    /// Floating-point PCM.
    #[error("expected integer PCM, found floating point")]
    Format,

    /// Fewer than two frames: nothing to loop over.
    #[error("recording too short: {0} frames (need at least 2)")]
    TooShort(usize),
}

/// Failure to load or validate the instrument configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Parsing/deserialization error from the `config` crate.
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    /// Pitch bounds or axis length invalid.
    #[error("invalid pitch axis: {0}")]
    Pitch(#[from] PitchError),

    /// Window must have a positive size.
    #[error("invalid window size {width}x{height}")]
    InvalidWindow { width: u32, height: u32 },

    /// Sample rate must be positive.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// Buffer size must be positive.
    #[error("invalid buffer size: {0} frames")]
    InvalidBufferFrames(u32),
}

/// Failure to open the audio output. Fatal: there is no instrument without it.
#[cfg(feature = "realtime")]
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The host has no default output device.
    #[error("no default audio output device")]
    NoDefaultDevice,

    /// Device not found.
    #[error("audio output device not found: {0}")]
    DeviceNotFound(String),

    /// Failed to enumerate devices.
    #[error("failed to enumerate audio devices")]
    Devices(#[from] cpal::DevicesError),

    /// Failed to read a device name.
    #[error("failed to read audio device name")]
    DeviceName(#[from] cpal::DeviceNameError),

    /// Failed to query supported configs.
    #[error("failed to query supported output configs")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    /// The device reports no output configs at all.
    #[error("device has no supported output configs")]
    NoSupportedConfig,

    /// Failed to build stream.
    #[error("failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    /// Failed to play stream.
    #[error("failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The negotiated sample format has no conversion from 8-bit PCM.
    #[error("unsupported device sample format: {0}")]
    UnsupportedFormat(String),
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sample(#[from] SampleLoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pitch(#[from] PitchError),

    #[cfg(feature = "realtime")]
    #[error(transparent)]
    Device(#[from] DeviceError),
}
