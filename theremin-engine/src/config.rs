//! Instrument configuration: pitch axis, window, reference sample and audio output.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes. Command-line overrides are applied by the caller before
//! [`InstrumentConfig::validate`].

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::Deserialize;
use theremin_core::pitch::{PitchAxis, Scale};

use crate::error::ConfigError;
use crate::voice::Interpolation;

/// The configuration for an instrument.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Frequency at the left edge of the axis (Hz).
    pub low_hz: f64,
    /// Frequency at the right edge of the axis (Hz).
    pub high_hz: f64,
    /// How positions are spread over the frequency range.
    pub scale: Scale,
    /// Optional 440 Hz reference recording; additive synthesis when absent.
    pub sample_file: Option<PathBuf>,
    /// Width of the playing surface; also the pitch axis length.
    pub window_width: u32,
    /// Height of the playing surface; the volume axis.
    pub window_height: u32,
    /// Output sample rate requested from the device.
    pub sample_rate: u32,
    /// Frames per device buffer requested from the device.
    pub buffer_frames: u32,
    /// How the reference recording is read between stored samples.
    pub interpolation: Interpolation,
    /// Output device name; the host default when absent.
    pub device: Option<String>,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            low_hz: 500.0,
            high_hz: 3000.0,
            scale: Scale::Logarithmic,
            sample_file: None,
            window_width: 800,
            window_height: 600,
            sample_rate: 16_000,
            buffer_frames: 128,
            interpolation: Interpolation::Linear,
            device: None,
        }
    }
}

impl InstrumentConfig {
    /// Parse a configuration file; the format follows the file extension.
    pub fn deserialize(path: &Path) -> Result<InstrumentConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<InstrumentConfig>()?)
    }

    /// Parse YAML text.
    pub fn from_yaml(yaml: &str) -> Result<InstrumentConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<InstrumentConfig>()?)
    }

    /// Check every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidWindow { width: self.window_width, height: self.window_height });
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.buffer_frames == 0 {
            return Err(ConfigError::InvalidBufferFrames(self.buffer_frames));
        }
        self.pitch_axis()?;
        Ok(())
    }

    /// The pitch axis spanning the window width.
    pub fn pitch_axis(&self) -> Result<PitchAxis<f64>, ConfigError> {
        Ok(PitchAxis::new(self.low_hz, self.high_hz, f64::from(self.window_width), self.scale)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_dialog() {
        let c = InstrumentConfig::default();
        assert_eq!(c.low_hz, 500.0);
        assert_eq!(c.high_hz, 3000.0);
        assert_eq!(c.scale, Scale::Logarithmic);
        assert_eq!((c.window_width, c.window_height), (800, 600));
        assert_eq!(c.sample_rate, 16_000);
        assert_eq!(c.buffer_frames, 128);
        assert!(c.sample_file.is_none());
        c.validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
            low_hz: 100
            high_hz: 3500
            scale: linear
            sample_file: /tmp/a440.wav
            interpolation: nearest
        "#;
        let c = InstrumentConfig::from_yaml(yaml).unwrap();
        assert_eq!(c.low_hz, 100.0);
        assert_eq!(c.high_hz, 3500.0);
        assert_eq!(c.scale, Scale::Linear);
        assert_eq!(c.interpolation, Interpolation::Nearest);
        assert_eq!(c.sample_file.as_deref(), Some(Path::new("/tmp/a440.wav")));
        assert_eq!(c.window_width, 800);
        assert!(c.device.is_none());
    }

    #[test]
    fn reads_file_by_extension() {
        let mut f = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(f, "window_width: 1024\ndevice: pulse").unwrap();
        let c = InstrumentConfig::deserialize(f.path()).unwrap();
        assert_eq!(c.window_width, 1024);
        assert_eq!(c.device.as_deref(), Some("pulse"));
    }

    #[test]
    fn pitch_axis_spans_window() {
        let c = InstrumentConfig { scale: Scale::Linear, ..InstrumentConfig::default() };
        let axis = c.pitch_axis().unwrap();
        assert_eq!(axis.length(), 800.0);
        assert_eq!(axis.axis_to_frequency(400.0), 1750.0);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let inverted = InstrumentConfig { low_hz: 3000.0, high_hz: 500.0, ..InstrumentConfig::default() };
        assert!(matches!(inverted.validate(), Err(ConfigError::Pitch(_))));

        let flat = InstrumentConfig { window_height: 0, ..InstrumentConfig::default() };
        assert!(matches!(flat.validate(), Err(ConfigError::InvalidWindow { .. })));

        let silent = InstrumentConfig { sample_rate: 0, ..InstrumentConfig::default() };
        assert!(matches!(silent.validate(), Err(ConfigError::InvalidSampleRate(0))));

        let empty = InstrumentConfig { buffer_frames: 0, ..InstrumentConfig::default() };
        assert!(matches!(empty.validate(), Err(ConfigError::InvalidBufferFrames(0))));
    }

    #[test]
    fn unknown_scale_is_an_error() {
        assert!(matches!(InstrumentConfig::from_yaml("scale: cubic"), Err(ConfigError::Load(_))));
    }
}
