//! Generic DSP utilities and math helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` cosine for the additive synthesis hot path
//! - Clean, side-effect free helpers that are easy to test
//!
//! Conventions:
//! - All functions are `#[inline]` where useful to help the optimizer.
//! - Unsigned 8-bit PCM is centered on [`SILENCE_U8`].

#![allow(clippy::excessive_precision)]

use core::f32::consts::{FRAC_PI_2, PI};

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // libm (C math) in no_std
    if #[cfg(feature = "no-std")] {
        #[inline] fn m_cos(x: f32) -> f32 { libm::cosf(x) }
        #[inline] fn m_floor(x: f32) -> f32 { libm::floorf(x) }
        #[inline] fn m_round(x: f32) -> f32 { libm::roundf(x) }
    // std backend
    } else {
        #[inline] fn m_cos(x: f32) -> f32 { x.cos() }
        #[inline] fn m_floor(x: f32) -> f32 { x.floor() }
        #[inline] fn m_round(x: f32) -> f32 { x.round() }
    }
}

// --------------------------------- Constants -------------------------------------

/// 2π (one full turn of a phase accumulator, in radians)
pub const TAU: f32 = 2.0 * PI;

/// Midpoint of the unsigned 8-bit range: zero signal.
pub const SILENCE_U8: u8 = 128;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap a phase in radians into [0, 2π).
///
/// Only whole turns are removed, so the fractional position within the
/// cycle is kept.
#[inline]
pub fn wrap_phase(p: f32) -> f32 {
    let w = p - TAU * m_floor(p / TAU);
    // rounding can land exactly on TAU for tiny negative inputs
    if w >= TAU { w - TAU } else if w < 0.0 { 0.0 } else { w }
}

/// Convert a signed level in 8-bit units to unsigned 8-bit PCM:
/// `round(level + 128)`, clamped to `0..=255`.
#[inline]
pub fn level_to_u8(level: f32) -> u8 {
    let v = m_round(level + f32::from(SILENCE_U8));
    // clamped above, so the cast cannot truncate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        clamp(v, 0.0, 255.0) as u8
    }
}

// --------------------------------- Fast trig -------------------------------------

/// Fast sine: range reduction into [-π, π], a fold into [-π/2, π/2] via
/// `sin(x) = sin(π - x)`, then a 5th-order odd polynomial.
/// Max abs error ~2e-4 for musical uses.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    let k = m_round(x / TAU);
    let mut xr = x - k * TAU;
    if xr > FRAC_PI_2 {
        xr = PI - xr;
    } else if xr < -FRAC_PI_2 {
        xr = -PI - xr;
    }

    // sin(x) ≈ x * (1 + b x^2 + c x^4), valid on [-π/2, π/2]
    let x2 = xr * xr;
    xr * (1.0 + x2 * (-0.166_05 + x2 * 0.007_61))
}

/// Cosine used by the oscillators. Exact unless `fast-math` is enabled.
#[inline]
pub fn cos(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            // cos(x) = sin(x + π/2)
            fast_sin(x + FRAC_PI_2)
        } else {
            m_cos(x)
        }
    }
}

// --------------------------------- Tests (std only) ------------------------------
