//! C ABI wrapper for the theremin engine.
//!
//! The host owns the audio device and pulls unsigned 8-bit mono PCM with
//! `theremin_render_u8`; every other call is a control operation.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle types, both heap-allocated (you own/delete them):
//!   - `ThereminEngine`: rendering and sample loading
//!   - `ThereminTone`: the control operations
//! - Null handles and buffers are ignored, or answered with 0 / NaN / an error code.
//!
//! Threading
//! - `ThereminEngine` belongs to the audio thread: render and load from that
//!   thread only, and take the tone handle before the audio thread starts.
//! - `ThereminTone` may be used from any thread at any time, concurrently with
//!   rendering. It shares the engine's parameters and never blocks.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::ffi::{c_char, CStr};
use std::path::Path;
use std::sync::Arc;

use theremin_core::notes::frequency_to_note;
use theremin_core::pitch::{PitchAxis, Scale};
use theremin_engine::{load_sample, Engine, Interpolation, ToneState, Voice};
use tracing::warn;

pub const THEREMIN_OK: i32 = 0;
pub const THEREMIN_ERR_NULL: i32 = -1;
pub const THEREMIN_ERR_PATH: i32 = -2;
pub const THEREMIN_ERR_LOAD: i32 = -3;

/// Opaque engine handle we hand to C. Audio thread only.
#[repr(C)]
pub struct ThereminEngine {
    inner: Engine<Voice>,
}

impl ThereminEngine {
    fn new(sr: f32) -> Self {
        let sr = if sr.is_finite() { sr.max(1.0) } else { 1.0 };
        let voice = Voice::new(None, Interpolation::default());
        Self { inner: Engine::new(voice, Arc::new(ToneState::default()), sr) }
    }
}

/// Opaque control handle. Shares the engine's tone state and is safe to use
/// from any thread while the engine renders.
#[repr(C)]
pub struct ThereminTone {
    tone: Arc<ToneState>,
}

fn tone_ref<'a>(handle: *const ThereminTone) -> Option<&'a ToneState> {
    unsafe { handle.as_ref() }.map(|t| &*t.tone)
}

// --- Creation / destruction -------------------------------------------------------

/// Create an engine rendering at `sample_rate`, starting in additive mode and silent.
#[no_mangle]
pub extern "C" fn theremin_create(sample_rate: f32) -> *mut ThereminEngine {
    Box::into_raw(Box::new(ThereminEngine::new(sample_rate)))
}

/// Destroy an engine previously returned by `theremin_create`.
#[no_mangle]
pub extern "C" fn theremin_destroy(engine: *mut ThereminEngine) {
    if !engine.is_null() {
        unsafe { drop(Box::from_raw(engine)); }
    }
}

/// Switch to sample playback from a 440 Hz mono 16-bit WAV file.
///
/// On failure the current voice is kept and an error code is returned.
#[no_mangle]
pub extern "C" fn theremin_load_sample(engine: *mut ThereminEngine, path: *const c_char) -> i32 {
    if engine.is_null() || path.is_null() {
        return THEREMIN_ERR_NULL;
    }
    let e = unsafe { &mut *engine };
    let Ok(path) = unsafe { CStr::from_ptr(path) }.to_str() else {
        return THEREMIN_ERR_PATH;
    };
    match load_sample(Path::new(path)) {
        Ok(sample) => {
            e.inner.swap_generator(Voice::new(Some(&sample), Interpolation::default()));
            THEREMIN_OK
        }
        Err(err) => {
            warn!(path, "could not load the sound file: {err}");
            THEREMIN_ERR_LOAD
        }
    }
}

// --- Control ---------------------------------------------------------------------

/// Control handle for `engine`. Call before handing the engine to the audio
/// thread. The handle stays valid after the engine is destroyed.
#[no_mangle]
pub extern "C" fn theremin_tone(engine: *const ThereminEngine) -> *mut ThereminTone {
    let Some(e) = (unsafe { engine.as_ref() }) else {
        return std::ptr::null_mut();
    };
    Box::into_raw(Box::new(ThereminTone { tone: Arc::clone(e.inner.tone()) }))
}

/// Destroy a control handle previously returned by `theremin_tone`.
#[no_mangle]
pub extern "C" fn theremin_tone_destroy(tone: *mut ThereminTone) {
    if !tone.is_null() {
        unsafe { drop(Box::from_raw(tone)); }
    }
}

#[no_mangle]
pub extern "C" fn theremin_set_pitch(handle: *const ThereminTone, frequency: f32) {
    if let Some(t) = tone_ref(handle) { t.set_pitch(frequency); }
}

/// Volume in [0, 1]; out-of-range values are clamped.
#[no_mangle]
pub extern "C" fn theremin_set_volume(handle: *const ThereminTone, volume: f32) {
    if let Some(t) = tone_ref(handle) { t.set_volume(volume); }
}

#[no_mangle]
pub extern "C" fn theremin_play(handle: *const ThereminTone) {
    if let Some(t) = tone_ref(handle) { t.play(); }
}

#[no_mangle]
pub extern "C" fn theremin_stop(handle: *const ThereminTone) {
    if let Some(t) = tone_ref(handle) { t.stop(); }
}

#[no_mangle]
pub extern "C" fn theremin_is_playing(handle: *const ThereminTone) -> bool {
    tone_ref(handle).is_some_and(ToneState::is_playing)
}

// --- Rendering -------------------------------------------------------------------

/// Render `frames` of unsigned 8-bit mono PCM into `out`.
///
/// Returns the number of frames rendered (0 on error).
#[no_mangle]
pub extern "C" fn theremin_render_u8(engine: *mut ThereminEngine, out: *mut u8, frames: u32) -> u32 {
    if engine.is_null() || out.is_null() || frames == 0 {
        return 0;
    }
    let e = unsafe { &mut *engine };
    let out = unsafe { std::slice::from_raw_parts_mut(out, frames as usize) };
    e.inner.render(out);
    frames
}

// --- Pitch helpers ---------------------------------------------------------------

/// Write the note name for `frequency` (e.g. "A4") as a NUL-terminated string.
///
/// Returns the name length, or 0 for an invalid frequency or a buffer too small.
#[no_mangle]
pub extern "C" fn theremin_frequency_to_note(frequency: f64, buf: *mut c_char, len: usize) -> usize {
    if buf.is_null() {
        return 0;
    }
    let Ok(note) = frequency_to_note(frequency) else {
        return 0;
    };
    let name = note.to_string();
    let bytes = name.as_bytes();
    if bytes.len() >= len {
        return 0;
    }
    let out = unsafe { std::slice::from_raw_parts_mut(buf.cast::<u8>(), len) };
    out[..bytes.len()].copy_from_slice(bytes);
    out[bytes.len()] = 0;
    bytes.len()
}

/// Frequency at position `x` on an axis of `length` spanning `low..high`.
///
/// Returns NaN when the axis is invalid.
#[no_mangle]
pub extern "C" fn theremin_axis_to_frequency(x: f64, low: f64, high: f64, length: f64, linear: bool) -> f64 {
    let scale = if linear { Scale::Linear } else { Scale::Logarithmic };
    PitchAxis::new(low, high, length, scale).map_or(f64::NAN, |axis| axis.axis_to_frequency(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::thread;

    #[test]
    fn silent_until_played() {
        let e = theremin_create(16_000.0);
        let t = theremin_tone(e);
        let mut buf = [0u8; 64];
        assert_eq!(theremin_render_u8(e, buf.as_mut_ptr(), 64), 64);
        assert!(buf.iter().all(|&b| b == 128));
        assert!(!theremin_is_playing(t));

        theremin_set_pitch(t, 440.0);
        theremin_set_volume(t, 1.0);
        theremin_play(t);
        assert!(theremin_is_playing(t));
        theremin_render_u8(e, buf.as_mut_ptr(), 64);
        assert!(buf.iter().any(|&b| b != 128));
        // four harmonics of weight 25 never leave ±100
        assert!(buf.iter().all(|&b| (28..=228).contains(&b)));

        theremin_stop(t);
        theremin_render_u8(e, buf.as_mut_ptr(), 64);
        assert!(buf.iter().all(|&b| b == 128));
        theremin_tone_destroy(t);
        theremin_destroy(e);
    }

    #[test]
    fn control_from_another_thread_while_rendering() {
        let mut engine = unsafe { Box::from_raw(theremin_create(16_000.0)) };
        let t = theremin_tone(&*engine);
        theremin_set_volume(t, 1.0);
        theremin_play(t);

        let audio = thread::spawn(move || {
            let mut buf = [0u8; 64];
            let mut loud = 0;
            for _ in 0..2000 {
                theremin_render_u8(&mut *engine, buf.as_mut_ptr(), 64);
                if buf.iter().any(|&b| b != 128) {
                    loud += 1;
                }
            }
            (engine, loud)
        });
        for i in 0..2000_u16 {
            theremin_set_pitch(t, 200.0 + f32::from(i));
            theremin_set_volume(t, 0.5 + f32::from(i % 2) * 0.5);
        }
        let (engine, loud) = audio.join().unwrap();
        assert!(loud > 0);

        // the control handle outlives the engine
        theremin_destroy(Box::into_raw(engine));
        theremin_stop(t);
        assert!(!theremin_is_playing(t));
        theremin_tone_destroy(t);
    }

    #[test]
    fn null_handles_are_ignored() {
        let mut buf = [0u8; 4];
        assert_eq!(theremin_render_u8(std::ptr::null_mut(), buf.as_mut_ptr(), 4), 0);
        assert!(theremin_tone(std::ptr::null()).is_null());
        assert!(!theremin_is_playing(std::ptr::null()));
        theremin_play(std::ptr::null());
        theremin_set_pitch(std::ptr::null(), 440.0);
        theremin_tone_destroy(std::ptr::null_mut());
        theremin_destroy(std::ptr::null_mut());
        assert_eq!(theremin_load_sample(std::ptr::null_mut(), std::ptr::null()), THEREMIN_ERR_NULL);
    }

    #[test]
    fn load_sample_switches_voice() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a440.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            w.write_sample(i16::MAX).unwrap();
        }
        w.finalize().unwrap();

        let e = theremin_create(16_000.0);
        let t = theremin_tone(e);
        let missing = CString::new(dir.path().join("nope.wav").to_str().unwrap()).unwrap();
        assert_eq!(theremin_load_sample(e, missing.as_ptr()), THEREMIN_ERR_LOAD);

        let good = CString::new(path.to_str().unwrap()).unwrap();
        assert_eq!(theremin_load_sample(e, good.as_ptr()), THEREMIN_OK);
        theremin_set_volume(t, 1.0);
        theremin_play(t);
        let mut buf = [0u8; 8];
        theremin_render_u8(e, buf.as_mut_ptr(), 8);
        // full-scale sample at full volume peaks at the playback headroom
        assert!(buf.iter().all(|&b| b == 248));
        theremin_tone_destroy(t);
        theremin_destroy(e);
    }

    #[test]
    fn note_names_into_c_buffers() {
        let mut buf = [0 as c_char; 8];
        assert_eq!(theremin_frequency_to_note(440.0, buf.as_mut_ptr(), buf.len()), 2);
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
        assert_eq!(name.to_str().unwrap(), "A4");

        let mut tiny = [0 as c_char; 2];
        assert_eq!(theremin_frequency_to_note(440.0, tiny.as_mut_ptr(), tiny.len()), 0);
        assert_eq!(theremin_frequency_to_note(-1.0, buf.as_mut_ptr(), buf.len()), 0);
    }

    #[test]
    fn axis_mapping() {
        assert_eq!(theremin_axis_to_frequency(400.0, 500.0, 3000.0, 800.0, true), 1750.0);
        assert!(theremin_axis_to_frequency(0.0, 3000.0, 500.0, 800.0, true).is_nan());
    }
}
