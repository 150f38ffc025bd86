//! # Delay Time Smoother
//!
//! When the user moves the delay knob, the read head has to travel to its
//! new position. Jumping there instantly produces a click; moving it
//! gradually produces a short pitch glide (the read head briefly runs
//! faster or slower than the write head), which is the familiar "tape
//! delay" sound.
//!
//! The glide is a one-pole lowpass on the delay time, the same structure
//! as the classic RC smoothing filter:
//!
//! ```text
//! y[n] = y[n-1] - c * (y[n-1] - target)
//!      = (1 - c) * y[n-1] + c * target
//! ```
//!
//! Every sample closes a fixed fraction `c` of the remaining distance, so
//! the error shrinks geometrically:
//!
//! ```text
//! error[n] = error[0] * (1 - c)^n
//! ```
//!
//! With the default `c = 0.001` the error falls to 0.1% of the step after
//! 6905 samples (about 157 ms at 44.1 kHz).

/// One-pole smoother for the delay time, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct DelaySmoother {
    /// Fraction of the remaining distance covered per sample, in `(0, 1]`.
    coefficient: f32,
    value: f32,
}

impl DelaySmoother {
    pub fn new(coefficient: f32) -> Self {
        Self {
            coefficient,
            value: 0.0,
        }
    }

    pub fn set_coefficient(&mut self, coefficient: f32) {
        self.coefficient = coefficient;
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    /// Jump straight to `value` with no glide.
    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }

    /// The current smoothed value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Move one sample toward `target` and return the new value.
    #[inline]
    pub fn step(&mut self, target: f32) -> f32 {
        self.value -= self.coefficient * (self.value - target);
        self.value
    }

    /// How many steps it takes for the error to shrink to `tolerance`
    /// times its starting size (e.g. `0.001` for 0.1%).
    ///
    /// ```text
    /// n = ceil( ln(tolerance) / ln(1 - c) )
    /// ```
    pub fn samples_to_settle(&self, tolerance: f32) -> usize {
        if tolerance >= 1.0 {
            return 0;
        }
        let coefficient = f64::from(self.coefficient);
        if coefficient >= 1.0 {
            return 1;
        }

        let tolerance = f64::from(tolerance.max(f32::MIN_POSITIVE));
        (tolerance.ln() / (1.0 - coefficient).ln()).ceil() as usize
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
