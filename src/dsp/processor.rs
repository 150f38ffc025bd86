//! # Block Processor
//!
//! Runs the delay one sample at a time. For every sample, in order:
//!
//! 1. Convert the *previous* smoothed delay time to samples.
//! 2. Glide the smoothed delay time toward the target.
//! 3. **Write** `input + feedback` at the write head.
//! 4. Compute the read position `head - delay`, wrapped into the ring.
//! 5. **Read** the delayed pair with linear interpolation.
//! 6. Scale the delayed pair by the feedback amount; it is added to the
//!    *next* sample's write.
//! 7. **Mix** `input * (1 - dry_wet) + delayed * dry_wet` into the output.
//! 8. **Advance** the write head.
//!
//! ```text
//! Input ──┬──────────────────────────────────────── × (1 - mix) ───┐
//!         │                                                        │
//!         └──►(+)──► [Stereo Delay Line] ──► delayed ── × mix ───►(+)──► Output
//!              ▲                                │
//!              └─── one sample later ◄── × feedback
//! ```
//!
//! Because the write happens before the read, a delay shorter than one
//! sample interpolates toward the sample that was just written, and
//! feedback re-enters the line one sample after it was read. An echo
//! train with a delay of `D` samples therefore has its repeats at `D`,
//! `2D + 1`, `3D + 2`, ...
//!
//! Nothing here allocates, locks or logs. Buffers are sized in
//! [`prepare()`](DelayProcessor::prepare), which the host never runs
//! concurrently with processing.

use crate::config::EngineConfig;
use crate::dsp::delay_line::StereoDelayLine;
use crate::dsp::interpolation::resolve;
use crate::dsp::smoother::DelaySmoother;
use crate::error::PrepareError;
use crate::params::DelaySettings;

/// The stereo delay engine: delay line, delay-time glide and feedback
/// state.
pub struct DelayProcessor {
    config: EngineConfig,

    /// Set by [`prepare()`](Self::prepare). The placeholder value is never
    /// used for processing because the delay line is empty until then.
    sample_rate: f32,

    delay_line: StereoDelayLine,

    /// Smoothed delay time in seconds.
    smoother: DelaySmoother,

    /// Delayed output of the previous sample, already scaled by the
    /// feedback amount.
    feedback_left: f32,
    feedback_right: f32,
}

impl DelayProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sample_rate: 44100.0,
            delay_line: StereoDelayLine::new(),
            smoother: DelaySmoother::new(config.smoothing.coefficient(44100.0)),
            feedback_left: 0.0,
            feedback_right: 0.0,
        }
    }

    /// Size the delay line for `sample_rate`, clear all state and start
    /// the delay time at `delay_time_target` (seconds) with no glide.
    ///
    /// Safe to call repeatedly. Returns the delay line capacity in
    /// samples.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        delay_time_target: f32,
    ) -> Result<usize, PrepareError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }

        let capacity = self
            .delay_line
            .initialize(sample_rate, self.config.max_delay_seconds)?;

        self.sample_rate = sample_rate;
        self.smoother
            .set_coefficient(self.config.smoothing.coefficient(sample_rate));
        self.reset(delay_time_target);

        Ok(capacity)
    }

    /// Free the delay line. Until the next [`prepare()`](Self::prepare)
    /// the processor passes audio through untouched.
    pub fn release(&mut self) {
        self.delay_line.release();
        self.feedback_left = 0.0;
        self.feedback_right = 0.0;
    }

    /// Silence the delay line and the feedback path and snap the delay
    /// time to `delay_time_target`. Does not allocate.
    pub fn reset(&mut self, delay_time_target: f32) {
        self.delay_line.clear();
        self.feedback_left = 0.0;
        self.feedback_right = 0.0;
        self.smoother.reset(delay_time_target);
    }

    /// Process one block in place.
    ///
    /// `channels` is the host's output buffer, already holding the input.
    /// Channels past `num_input_channels` have no input and are silenced.
    /// The first two channels are left and right.
    ///
    /// `settings` is called once per sample, so parameter changes take
    /// effect on the exact sample they arrive at.
    pub fn process_block<F>(
        &mut self,
        channels: &mut [&mut [f32]],
        num_input_channels: usize,
        mut settings: F,
    ) where
        F: FnMut() -> DelaySettings,
    {
        for channel in channels.iter_mut().skip(num_input_channels) {
            channel.fill(0.0);
        }

        nih_plug::nih_debug_assert!(num_input_channels >= 2);
        if num_input_channels < 2 {
            return;
        }
        let [left, right, ..] = channels else {
            return;
        };

        for (left, right) in left.iter_mut().zip(right.iter_mut()) {
            let (out_left, out_right) = self.process_frame(*left, *right, &settings());
            *left = out_left;
            *right = out_right;
        }
    }

    /// Run the eight steps of the delay for one stereo sample and return
    /// the output pair.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32, settings: &DelaySettings) -> (f32, f32) {
        let len = self.delay_line.len();
        if len == 0 {
            return (left, right);
        }

        // The delay can never reach a full buffer length: at exactly `len`
        // samples the read would land on the slot written this sample.
        let delay_time = (self.sample_rate * self.smoother.value()).clamp(0.0, (len - 1) as f32);

        self.smoother.step(settings.delay_time);

        let head = self.delay_line.head();
        self.delay_line
            .write(head, left + self.feedback_left, right + self.feedback_right);

        let read_position = wrap_read_position(head as f32 - delay_time, len);
        let delayed = resolve(self.delay_line.left(), self.delay_line.right(), read_position);

        self.feedback_left = delayed.left * settings.feedback;
        self.feedback_right = delayed.right * settings.feedback;

        let dry = 1.0 - settings.dry_wet;
        let out_left = left * dry + delayed.left * settings.dry_wet;
        let out_right = right * dry + delayed.right * settings.dry_wet;

        self.delay_line.advance_head();

        (out_left, out_right)
    }

    /// How many samples of output remain after the input goes silent.
    ///
    /// Each trip around the feedback loop scales the echo by `feedback`,
    /// so after N repeats the level is `feedback^N`. Solving for -60 dB:
    ///
    /// ```text
    /// N = log10(0.001) / log10(feedback) = -3 / log10(feedback)
    /// ```
    ///
    /// N repeats of the current delay time is the tail.
    pub fn tail_samples(&self, feedback: f32) -> u32 {
        let delay_samples = self.sample_rate * self.smoother.value();

        if feedback > 0.001 {
            let repeats = -3.0 / feedback.log10();
            (repeats * delay_samples) as u32
        } else {
            delay_samples as u32
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Smoothed delay time in seconds.
    pub fn delay_smooth(&self) -> f32 {
        self.smoother.value()
    }

    /// The feedback contribution waiting to be added to the next write.
    pub fn feedback_state(&self) -> (f32, f32) {
        (self.feedback_left, self.feedback_right)
    }

    pub fn delay_line(&self) -> &StereoDelayLine {
        &self.delay_line
    }
}

impl Default for DelayProcessor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Wrap `position` into `[0, len)`.
///
/// The delay is clamped below the buffer length, so a single `+ len` would
/// do; the Euclidean remainder also covers anything further out.
#[inline]
fn wrap_read_position(position: f32, len: usize) -> f32 {
    let len = len as f32;
    let wrapped = position.rem_euclid(len);
    // A tiny negative input can round up to exactly `len`.
    if wrapped >= len {
        0.0
    } else {
        wrapped
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
