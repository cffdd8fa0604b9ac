//! Audio output via CPAL.
//!
//! The instrument wants a mono, unsigned 8-bit stream at a fixed rate with a
//! small fixed buffer. Devices that cannot do exactly that get the closest
//! supported config; the engine still renders 8-bit mono into a scratch buffer
//! allocated once, and the callback converts and fans it out to every channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig, SupportedBufferSize};
use theremin_core::dsp::SILENCE_U8;
use tracing::{debug, error, info};

use crate::config::InstrumentConfig;
use crate::error::DeviceError;
use crate::graph::{Engine, Generator};

/// Frames rendered per engine call inside the device callback.
const SCRATCH_FRAMES: usize = 4096;

/// What to ask the output device for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSpec {
    pub device: Option<String>,
    pub sample_rate: u32,
    pub buffer_frames: u32,
}

impl From<&InstrumentConfig> for OutputSpec {
    fn from(c: &InstrumentConfig) -> Self {
        Self { device: c.device.clone(), sample_rate: c.sample_rate, buffer_frames: c.buffer_frames }
    }
}

/// Names of the host's output devices.
pub fn list_output_devices() -> Result<Vec<String>, DeviceError> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    for dev in host.output_devices()? {
        names.push(dev.name()?);
    }
    Ok(names)
}

fn pick_device(name: Option<&str>) -> Result<cpal::Device, DeviceError> {
    let host = cpal::default_host();
    if let Some(name) = name {
        for d in host.output_devices()? {
            if d.name()? == name {
                return Ok(d);
            }
        }
        return Err(DeviceError::DeviceNotFound(name.to_string()));
    }
    host.default_output_device().ok_or(DeviceError::NoDefaultDevice)
}

fn format_penalty(format: SampleFormat) -> u64 {
    match format {
        SampleFormat::U8 => 0,
        SampleFormat::I16 | SampleFormat::F32 => 1,
        SampleFormat::I8 | SampleFormat::U16 | SampleFormat::I32 | SampleFormat::U32 | SampleFormat::F64 => 2,
        _ => 1000,
    }
}

/// Lower is better. Rate mismatch dominates, then channel count, then format.
pub(crate) fn config_score(channels: u16, min_rate: u32, max_rate: u32, format: SampleFormat, rate: u32) -> u64 {
    let ch_pen = u64::from(channels.abs_diff(1));
    let sr_pen = if (min_rate..=max_rate).contains(&rate) {
        0
    } else {
        u64::from(min_rate.abs_diff(rate).min(max_rate.abs_diff(rate)))
    };
    sr_pen.saturating_mul(10_000) + ch_pen * 10 + format_penalty(format)
}

/// A device plus the concrete stream config chosen for it.
pub struct OutputTarget {
    device: cpal::Device,
    name: String,
    config: StreamConfig,
    sample_format: SampleFormat,
}

impl OutputTarget {
    #[inline] pub fn sample_rate(&self) -> u32 { self.config.sample_rate.0 }
    #[inline] pub fn channels(&self) -> u16 { self.config.channels }
    #[inline] pub fn sample_format(&self) -> SampleFormat { self.sample_format }
    #[inline] pub fn device_name(&self) -> &str { &self.name }
}

/// Pick the device and the supported config closest to `spec`.
pub fn negotiate(spec: &OutputSpec) -> Result<OutputTarget, DeviceError> {
    let device = pick_device(spec.device.as_deref())?;
    let name = device.name()?;

    let range = device
        .supported_output_configs()?
        .min_by_key(|r| {
            config_score(r.channels(), r.min_sample_rate().0, r.max_sample_rate().0, r.sample_format(), spec.sample_rate)
        })
        .ok_or(DeviceError::NoSupportedConfig)?;

    let rate = spec.sample_rate.clamp(range.min_sample_rate().0, range.max_sample_rate().0);
    let supported = range.with_sample_rate(SampleRate(rate));
    let buffer_size = match supported.buffer_size() {
        SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&spec.buffer_frames) => {
            BufferSize::Fixed(spec.buffer_frames)
        }
        _ => BufferSize::Default,
    };
    let sample_format = supported.sample_format();
    let mut config = supported.config();
    config.buffer_size = buffer_size;

    info!(
        device = %name,
        sample_rate = config.sample_rate.0,
        channels = config.channels,
        format = ?sample_format,
        buffer = ?config.buffer_size,
        "negotiated audio output"
    );
    Ok(OutputTarget { device, name, config, sample_format })
}

fn build_stream<T, G>(device: &cpal::Device, cfg: &StreamConfig, mut engine: Engine<G>) -> Result<cpal::Stream, DeviceError>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<u8> + Send + 'static,
    G: Generator + Send + 'static,
{
    let channels = usize::from(cfg.channels.max(1));
    let mut scratch = vec![SILENCE_U8; SCRATCH_FRAMES];

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
            for chunk in output.chunks_mut(SCRATCH_FRAMES * channels) {
                let block = &mut scratch[..chunk.len() / channels];
                engine.render(block);
                for (frame, &s) in chunk.chunks_mut(channels).zip(block.iter()) {
                    frame.fill(T::from_sample(s));
                }
            }
        },
        |err| error!("audio output stream error: {err}"),
        None,
    )?;
    Ok(stream)
}

/// A running output stream. Dropping it stops and releases the device.
pub struct AudioOutput {
    stream: cpal::Stream,
    name: String,
    config: StreamConfig,
}

impl AudioOutput {
    /// Hand `engine` to the audio thread and start playing.
    pub fn start<G>(target: OutputTarget, engine: Engine<G>) -> Result<Self, DeviceError>
    where
        G: Generator + Send + 'static,
    {
        let OutputTarget { device, name, config, sample_format } = target;
        let stream = match sample_format {
            SampleFormat::U8 => build_stream::<u8, G>(&device, &config, engine)?,
            SampleFormat::I8 => build_stream::<i8, G>(&device, &config, engine)?,
            SampleFormat::I16 => build_stream::<i16, G>(&device, &config, engine)?,
            SampleFormat::U16 => build_stream::<u16, G>(&device, &config, engine)?,
            SampleFormat::I32 => build_stream::<i32, G>(&device, &config, engine)?,
            SampleFormat::U32 => build_stream::<u32, G>(&device, &config, engine)?,
            SampleFormat::F32 => build_stream::<f32, G>(&device, &config, engine)?,
            SampleFormat::F64 => build_stream::<f64, G>(&device, &config, engine)?,
            other => return Err(DeviceError::UnsupportedFormat(format!("{other:?}"))),
        };
        stream.play()?;
        info!(device = %name, "audio output started");
        Ok(Self { stream, name, config })
    }

    #[inline] pub fn sample_rate(&self) -> u32 { self.config.sample_rate.0 }
    #[inline] pub fn channels(&self) -> u16 { self.config.channels }
    #[inline] pub fn device_name(&self) -> &str { &self.name }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        if let Err(e) = self.stream.pause() {
            debug!("pausing stream on close failed: {e}");
        }
        info!(device = %self.name, "audio output closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_zero() {
        assert_eq!(config_score(1, 8_000, 48_000, SampleFormat::U8, 16_000), 0);
    }

    #[test]
    fn rate_outweighs_channels_and_format() {
        let stereo_f32 = config_score(2, 44_100, 48_000, SampleFormat::F32, 44_100);
        let mono_u8_wrong_rate = config_score(1, 48_000, 48_000, SampleFormat::U8, 44_100);
        assert!(stereo_f32 < mono_u8_wrong_rate);
    }

    #[test]
    fn mono_preferred_over_format() {
        let mono_f32 = config_score(1, 8_000, 96_000, SampleFormat::F32, 16_000);
        let stereo_u8 = config_score(2, 8_000, 96_000, SampleFormat::U8, 16_000);
        assert!(mono_f32 < stereo_u8);
    }

    #[test]
    fn spec_from_config() {
        let c = InstrumentConfig { device: Some("hw:0".into()), ..InstrumentConfig::default() };
        let spec = OutputSpec::from(&c);
        assert_eq!(spec, OutputSpec { device: Some("hw:0".into()), sample_rate: 16_000, buffer_frames: 128 });
    }
}
