//! Pitch axis: position along a 1-D control axis ↔ frequency.
//!
//! - `Scale::Linear`      : frequency grows linearly with position
//! - `Scale::Logarithmic` : interpolation in log2 space, so equal distances
//!   along the axis are equal musical intervals
//!
//! Generic over [`num_traits::Float`]; the display side usually works in `f64`,
//! the audio side in `f32`.

use num_traits::Float;

use crate::error::PitchError;

/// How positions along the axis are spread over the frequency range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Scale {
    Linear,
    #[default]
    Logarithmic,
}

/// Bounds and scale of the control axis. `0 < low < high`, `length > 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PitchAxis<T = f64> {
    low: T,
    high: T,
    length: T,
    scale: Scale,
    // cached log2 of the bounds
    log_low: T,
    log_high: T,
}

#[inline]
pub(crate) fn to_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

impl<T: Float> PitchAxis<T> {
    /// Validate the bounds and build an axis of `length` units (pixels).
    pub fn new(low: T, high: T, length: T, scale: Scale) -> Result<Self, PitchError> {
        if !(low.is_finite() && high.is_finite() && low > T::zero() && low < high) {
            return Err(PitchError::InvalidRange { low: to_f64(low), high: to_f64(high) });
        }
        if !(length.is_finite() && length > T::zero()) {
            return Err(PitchError::InvalidAxisLength(to_f64(length)));
        }
        Ok(Self { low, high, length, scale, log_low: low.log2(), log_high: high.log2() })
    }

    #[inline] pub fn low(&self) -> T { self.low }
    #[inline] pub fn high(&self) -> T { self.high }
    #[inline] pub fn length(&self) -> T { self.length }
    #[inline] pub fn scale(&self) -> Scale { self.scale }

    /// Frequency (Hz) at position `x`. Positions outside `[0, length]` extrapolate.
    #[inline]
    pub fn axis_to_frequency(&self, x: T) -> T {
        let ratio = x / self.length;
        match self.scale {
            Scale::Linear => self.low + ratio * (self.high - self.low),
            // exact at both ends, so edge positions pass `contains`
            Scale::Logarithmic if x == T::zero() => self.low,
            Scale::Logarithmic if x == self.length => self.high,
            Scale::Logarithmic => {
                (ratio * self.log_high + (T::one() - ratio) * self.log_low).exp2()
            }
        }
    }

    /// Inverse of [`axis_to_frequency`](Self::axis_to_frequency).
    pub fn frequency_to_axis(&self, frequency: T) -> Result<T, PitchError> {
        if !(frequency.is_finite() && frequency > T::zero()) {
            return Err(PitchError::InvalidFrequency(to_f64(frequency)));
        }
        let ratio = match self.scale {
            Scale::Linear => (frequency - self.low) / (self.high - self.low),
            Scale::Logarithmic => {
                (frequency.log2() - self.log_low) / (self.log_high - self.log_low)
            }
        };
        Ok(ratio * self.length)
    }

    /// Whether `frequency` lies within the configured bounds (inclusive).
    #[inline]
    pub fn contains(&self, frequency: T) -> bool {
        frequency >= self.low && frequency <= self.high
    }
}

/// Free-function form of [`PitchAxis::axis_to_frequency`].
#[inline]
pub fn axis_to_frequency<T: Float>(x: T, axis: &PitchAxis<T>) -> T {
    axis.axis_to_frequency(x)
}

/// Free-function form of [`PitchAxis::frequency_to_axis`].
#[inline]
pub fn frequency_to_axis<T: Float>(frequency: T, axis: &PitchAxis<T>) -> Result<T, PitchError> {
    axis.frequency_to_axis(frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scenario_matches_reference_points() {
        let axis = PitchAxis::new(500.0, 3000.0, 800.0, Scale::Linear).unwrap();
        assert_eq!(axis.axis_to_frequency(0.0), 500.0);
        assert_eq!(axis.axis_to_frequency(400.0), 1750.0);
        assert!((axis.axis_to_frequency(799.0) - 2996.875).abs() < 1e-9);
    }

    #[test]
    fn log_midpoint_is_geometric_mean() {
        let axis = PitchAxis::new(100.0, 3500.0, 800.0, Scale::Logarithmic).unwrap();
        let mid = axis.axis_to_frequency(400.0);
        assert!((mid - (100.0_f64 * 3500.0).sqrt()).abs() < 1e-6, "mid={mid}");
        assert!((mid - 591.6).abs() < 0.01);
        assert!((axis.axis_to_frequency(0.0) - 100.0).abs() < 1e-9);
        assert!((axis.axis_to_frequency(800.0) - 3500.0).abs() < 1e-6);
    }

    #[test]
    fn log_spacing_is_equal_per_octave() {
        // 100..3200 is five octaves over 500 units: one octave per 100 units
        let axis = PitchAxis::new(100.0, 3200.0, 500.0, Scale::Logarithmic).unwrap();
        for i in 0..5 {
            let f0 = axis.axis_to_frequency(f64::from(i) * 100.0);
            let f1 = axis.axis_to_frequency(f64::from(i + 1) * 100.0);
            assert!((f1 / f0 - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn round_trip_both_scales() {
        for scale in [Scale::Linear, Scale::Logarithmic] {
            let axis = PitchAxis::new(500.0, 3000.0, 800.0, scale).unwrap();
            for x in 0..800 {
                let x = f64::from(x);
                let back = axis.frequency_to_axis(axis.axis_to_frequency(x)).unwrap();
                assert!((back - x).abs() < 1e-6, "{scale:?} x={x} back={back}");
            }
        }
    }

    #[test]
    fn round_trip_f32() {
        let axis = PitchAxis::new(100.0_f32, 3500.0, 640.0, Scale::Logarithmic).unwrap();
        for x in (0..640).step_by(7) {
            let x = x as f32;
            let back = frequency_to_axis(axis_to_frequency(x, &axis), &axis).unwrap();
            assert!((back - x).abs() < 1e-2, "x={x} back={back}");
        }
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            PitchAxis::new(3000.0, 500.0, 800.0, Scale::Linear),
            Err(PitchError::InvalidRange { .. })
        ));
        assert!(matches!(
            PitchAxis::new(0.0, 500.0, 800.0, Scale::Linear),
            Err(PitchError::InvalidRange { .. })
        ));
        assert!(matches!(
            PitchAxis::new(100.0, 500.0, 0.0, Scale::Linear),
            Err(PitchError::InvalidAxisLength(_))
        ));
    }

    #[test]
    fn inverse_rejects_non_positive_frequency() {
        let axis = PitchAxis::new(100.0, 500.0, 10.0, Scale::Logarithmic).unwrap();
        assert_eq!(axis.frequency_to_axis(0.0), Err(PitchError::InvalidFrequency(0.0)));
        assert!(axis.frequency_to_axis(-3.0).is_err());
        assert!(axis.frequency_to_axis(f64::NAN).is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let axis = PitchAxis::new(100.0, 500.0, 10.0, Scale::Linear).unwrap();
        assert!(axis.contains(100.0));
        assert!(axis.contains(500.0));
        assert!(!axis.contains(99.9));
        assert!(!axis.contains(500.1));
    }
}
