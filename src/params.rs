//! # Plugin Parameters
//!
//! The three knobs of the delay. Each parameter has a **stable string
//! ID** (`#[id = "..."]`) used by hosts to save and recall presets; once
//! published these IDs must never change.
//!
//! ## No framework smoothing
//!
//! Unlike most nih-plug plugins, none of these parameters use a
//! `SmoothingStyle`. The engine reads the plain values every sample:
//!
//! - **Delay time** is smoothed inside the engine by a slow one-pole
//!   glide (see [`crate::dsp::smoother`]). Stacking a second smoother on
//!   top would change the character of the glide.
//! - **Feedback** and **dry/wet** are simple gains, and with
//!   sample-accurate automation enabled the host already delivers their
//!   changes at the exact sample they happen.

use nih_plug::prelude::*;

use crate::config::MAX_DELAY_SECONDS;

pub const DEFAULT_DRY_WET: f32 = 0.5;
pub const DEFAULT_FEEDBACK: f32 = 0.5;
/// Default delay time in seconds.
pub const DEFAULT_DELAY_TIME: f32 = 0.5;

/// Feedback is capped below 1.0. At 1.0 the echoes would never decay, and
/// above it they would grow until they clip.
pub const MAX_FEEDBACK: f32 = 0.98;
/// Shortest delay time in seconds.
pub const MIN_DELAY_TIME: f32 = 0.01;

/// All user-facing parameters of Glide Delay.
#[derive(Params)]
pub struct DelayParams {
    /// **Dry/Wet**: 0% is the untouched input, 100% is only the echoes.
    #[id = "drywet"]
    pub dry_wet: FloatParam,

    /// **Feedback**: how much of each echo is fed back into the delay
    /// line. 0% gives a single echo; 98% gives a very long tail.
    #[id = "feedback"]
    pub feedback: FloatParam,

    /// **Delay**: time between the input and the first echo, in seconds.
    #[id = "delay"]
    pub delay_time: FloatParam,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            dry_wet: FloatParam::new(
                "Dry Wet",
                DEFAULT_DRY_WET,
                FloatRange::Linear { min: 0.0, max: 1.0 },
            )
            .with_unit("%")
            .with_value_to_string(formatters::v2s_f32_percentage(1))
            .with_string_to_value(formatters::s2v_f32_percentage()),

            feedback: FloatParam::new(
                "Feedback",
                DEFAULT_FEEDBACK,
                FloatRange::Linear {
                    min: 0.0,
                    max: MAX_FEEDBACK,
                },
            )
            .with_unit("%")
            .with_value_to_string(formatters::v2s_f32_percentage(1))
            .with_string_to_value(formatters::s2v_f32_percentage()),

            delay_time: FloatParam::new(
                "Delay",
                DEFAULT_DELAY_TIME,
                FloatRange::Linear {
                    min: MIN_DELAY_TIME,
                    max: MAX_DELAY_SECONDS,
                },
            )
            .with_unit(" s")
            .with_value_to_string(formatters::v2s_f32_rounded(3)),
        }
    }
}

impl DelayParams {
    /// The current plain values, read once per sample by the engine.
    ///
    /// The values are atomics written by the host and the editor. A read
    /// that straddles an update is harmless; at worst one sample uses the
    /// old value.
    #[inline]
    pub fn snapshot(&self) -> DelaySettings {
        DelaySettings {
            dry_wet: self.dry_wet.value(),
            feedback: self.feedback.value(),
            delay_time: self.delay_time.value(),
        }
    }
}

/// A plain copy of the parameter values for one sample.
///
/// This is all the DSP code ever sees of the parameters, which keeps
/// [`crate::dsp`] independent of nih-plug's parameter types and easy to
/// drive from tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySettings {
    /// `0.0..=1.0`
    pub dry_wet: f32,
    /// `0.0..=0.98`
    pub feedback: f32,
    /// Target delay time in seconds.
    pub delay_time: f32,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            dry_wet: DEFAULT_DRY_WET,
            feedback: DEFAULT_FEEDBACK,
            delay_time: DEFAULT_DELAY_TIME,
        }
    }
}
