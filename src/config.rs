//! # Engine Configuration
//!
//! Fixed settings of the delay engine that are not exposed to the user as
//! parameters: how much history the delay line keeps, and how the delay
//! time chases its target.
//!
//! The user-facing side of the configuration lives in [`crate::params`].

/// Longest delay the engine supports, in seconds. The delay line is sized
/// for exactly this much audio at the host's sample rate, and the delay
/// time parameter tops out at the same value.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Per-sample smoothing coefficient used for the delay time.
///
/// Each sample moves the smoothed delay time 0.1% of the remaining
/// distance toward the target. Slow enough that turning the delay knob
/// produces a gentle tape-style pitch glide instead of clicks.
pub const DEFAULT_SMOOTHING_COEFFICIENT: f32 = 0.001;

/// How the smoothed delay time follows the delay time parameter.
///
/// Both variants are the same one-pole lowpass:
///
/// ```text
/// smooth[n] = smooth[n-1] - c * (smooth[n-1] - target)
/// ```
///
/// They only differ in where the coefficient `c` comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelaySmoothing {
    /// A fixed coefficient applied once per sample.
    ///
    /// The glide therefore takes a fixed number of *samples*, so it is
    /// twice as fast at 96 kHz as it is at 48 kHz. This is the classic
    /// behavior and the default.
    PerSample(f32),

    /// A time constant in seconds. The coefficient is derived from the
    /// sample rate at prepare time, so the glide takes the same wall-clock
    /// time at every sample rate.
    TimeConstant(f32),
}

impl DelaySmoothing {
    /// Resolve the per-sample coefficient for a given sample rate.
    ///
    /// The result is clamped to `(0, 1]`. A coefficient of 1 jumps straight
    /// to the target; 0 would freeze the delay time forever.
    pub fn coefficient(self, sample_rate: f32) -> f32 {
        let coefficient = match self {
            Self::PerSample(coefficient) => coefficient,
            Self::TimeConstant(seconds) => {
                let samples = seconds * sample_rate;
                if samples <= 0.0 {
                    1.0
                } else {
                    1.0 - (-1.0 / samples).exp()
                }
            }
        };

        coefficient.clamp(f32::MIN_POSITIVE, 1.0)
    }
}

impl Default for DelaySmoothing {
    fn default() -> Self {
        Self::PerSample(DEFAULT_SMOOTHING_COEFFICIENT)
    }
}

/// Everything the [`DelayProcessor`](crate::dsp::processor::DelayProcessor)
/// needs to know besides the sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Capacity of the delay line in seconds.
    pub max_delay_seconds: f32,
    pub smoothing: DelaySmoothing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_delay_seconds: MAX_DELAY_SECONDS,
            smoothing: DelaySmoothing::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_sample_ignores_sample_rate() {
        let smoothing = DelaySmoothing::default();
        assert_eq!(smoothing.coefficient(44100.0), DEFAULT_SMOOTHING_COEFFICIENT);
        assert_eq!(smoothing.coefficient(96000.0), DEFAULT_SMOOTHING_COEFFICIENT);
    }

    /// A time constant should give a smaller per-sample step at higher
    /// sample rates, so the glide lasts the same number of seconds.
    #[test]
    fn test_time_constant_scales_with_sample_rate() {
        let smoothing = DelaySmoothing::TimeConstant(0.02);
        let at_48k = smoothing.coefficient(48000.0);
        let at_96k = smoothing.coefficient(96000.0);

        assert!(at_96k < at_48k, "Expected {at_96k} < {at_48k}");
        // For long time constants c ~= 1 / (tau * fs).
        assert!((at_48k - 1.0 / 960.0).abs() < 1e-5, "Got {at_48k}");
    }

    #[test]
    fn test_zero_time_constant_jumps() {
        assert_eq!(DelaySmoothing::TimeConstant(0.0).coefficient(48000.0), 1.0);
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_delay_seconds, 2.0);
        assert_eq!(config.smoothing, DelaySmoothing::PerSample(0.001));
    }
}
