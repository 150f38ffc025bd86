//! # Stereo Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples so they can be read back later. Think
//! of a circular tape loop: a write head records incoming audio while a
//! read head plays it back from a position further behind. The distance
//! between the two heads is the delay time.
//!
//! Here the "tape" is a pair of `Vec<f32>` (left and right) of identical
//! length, and the write head is a single index shared by both channels.
//! Once per sample the processor:
//!
//! 1. writes the new (input + feedback) pair at the head,
//! 2. reads a delayed pair somewhere behind the head
//!    (see [`interpolation`](super::interpolation)),
//! 3. advances the head by one, wrapping to 0 at the end of the buffer.
//!
//! ## Capacity
//!
//! ```text
//! capacity = floor(sample_rate * max_delay_seconds)
//! ```
//!
//! At 48 kHz with 2 seconds of history that is 96000 samples, about
//! 375 KB per channel. The buffers are allocated once, in
//! [`initialize()`](StereoDelayLine::initialize), and never resized on the
//! audio thread.

use crate::error::PrepareError;

/// Two equally sized ring buffers sharing one write head.
pub struct StereoDelayLine {
    left: Vec<f32>,
    right: Vec<f32>,

    /// Index of the next slot to be written. Always `< len()` while
    /// allocated, and 0 while released.
    head: usize,
}

impl StereoDelayLine {
    /// Create an empty (released) delay line. Nothing is allocated until
    /// [`initialize()`](Self::initialize) is called with a sample rate.
    pub const fn new() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            head: 0,
        }
    }

    /// Number of samples that fit in `max_delay_seconds` of audio.
    pub fn capacity_for(sample_rate: f32, max_delay_seconds: f32) -> usize {
        let samples = (f64::from(sample_rate) * f64::from(max_delay_seconds)).floor();
        if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        }
    }

    /// Size the buffers for `max_delay_seconds` at `sample_rate`, fill them
    /// with silence and move the head back to 0.
    ///
    /// Calling this again with the same configuration keeps the existing
    /// allocation and only clears it. A different capacity (the host
    /// changed the sample rate) replaces both buffers; the old ones are
    /// dropped.
    ///
    /// Returns the capacity in samples.
    pub fn initialize(
        &mut self,
        sample_rate: f32,
        max_delay_seconds: f32,
    ) -> Result<usize, PrepareError> {
        let capacity = Self::capacity_for(sample_rate, max_delay_seconds);
        if capacity == 0 {
            return Err(PrepareError::ZeroCapacity {
                sample_rate,
                max_delay_seconds,
            });
        }

        if self.left.len() != capacity {
            // Allocate both before replacing either so a failure leaves
            // the channels at equal length.
            let left = allocate_silence(capacity)?;
            let right = allocate_silence(capacity)?;
            self.left = left;
            self.right = right;
        }

        self.clear();
        Ok(capacity)
    }

    /// Free both buffers. Safe to call when already released.
    pub fn release(&mut self) {
        self.left = Vec::new();
        self.right = Vec::new();
        self.head = 0;
    }

    /// Fill both channels with silence and move the head to 0, keeping
    /// the allocation. Does not allocate, so it is safe on the audio
    /// thread.
    pub fn clear(&mut self) {
        self.left.fill(0.0);
        self.right.fill(0.0);
        self.head = 0;
    }

    /// Store a sample pair at `index`.
    ///
    /// The caller keeps `index < len()`; anything else is a logic error and
    /// panics on the slice bounds check.
    #[inline]
    pub fn write(&mut self, index: usize, left: f32, right: f32) {
        nih_plug::nih_debug_assert!(index < self.len());
        self.left[index] = left;
        self.right[index] = right;
    }

    /// Move the write head forward one slot, wrapping at the end.
    #[inline]
    pub fn advance_head(&mut self) {
        self.head += 1;
        if self.head >= self.len() {
            self.head = 0;
        }
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Capacity in samples (per channel). Zero while released.
    #[inline]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        !self.left.is_empty()
    }

    #[inline]
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &[f32] {
        &self.right
    }
}

impl Default for StereoDelayLine {
    fn default() -> Self {
        Self::new()
    }
}

/// A zeroed buffer of exactly `len` samples, reporting allocation failure
/// instead of aborting.
fn allocate_silence(len: usize) -> Result<Vec<f32>, PrepareError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_is_floored() {
        assert_eq!(StereoDelayLine::capacity_for(44100.0, 2.0), 88200);
        assert_eq!(StereoDelayLine::capacity_for(10.0, 0.25), 2);
        assert_eq!(StereoDelayLine::capacity_for(0.0, 2.0), 0);
        assert_eq!(StereoDelayLine::capacity_for(-48000.0, 2.0), 0);
        assert_eq!(StereoDelayLine::capacity_for(f32::NAN, 2.0), 0);
    }

    #[test]
    fn test_initialize_allocates_both_channels() {
        let mut dl = StereoDelayLine::new();
        assert!(!dl.is_allocated());

        let capacity = dl.initialize(1000.0, 2.0).unwrap();
        assert_eq!(capacity, 2000);
        assert_eq!(dl.left().len(), 2000);
        assert_eq!(dl.right().len(), 2000);
        assert_eq!(dl.head(), 0);
        assert!(dl.left().iter().chain(dl.right()).all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut dl = StereoDelayLine::new();
        let result = dl.initialize(0.0, 2.0);
        assert!(matches!(result, Err(PrepareError::ZeroCapacity { .. })));
        assert!(!dl.is_allocated());
    }

    /// Re-initializing with the same capacity must keep the allocation but
    /// wipe the contents and the head.
    #[test]
    fn test_reinitialize_reuses_allocation_and_clears() {
        let mut dl = StereoDelayLine::new();
        dl.initialize(100.0, 1.0).unwrap();

        for i in 0..30 {
            dl.write(dl.head(), i as f32, -(i as f32));
            dl.advance_head();
        }
        let left_ptr = dl.left().as_ptr();

        dl.initialize(100.0, 1.0).unwrap();
        assert_eq!(dl.left().as_ptr(), left_ptr, "Allocation should be reused");
        assert_eq!(dl.head(), 0);
        assert!(dl.left().iter().chain(dl.right()).all(|&s| s == 0.0));
    }

    /// A sample rate change must resize both channels, never leave the old
    /// (too small) buffer in place.
    #[test]
    fn test_reinitialize_with_new_sample_rate_resizes() {
        let mut dl = StereoDelayLine::new();
        dl.initialize(44100.0, 2.0).unwrap();
        dl.initialize(96000.0, 2.0).unwrap();

        assert_eq!(dl.len(), 192000);
        assert_eq!(dl.right().len(), 192000);
    }

    #[test]
    fn test_write_stores_pair() {
        let mut dl = StereoDelayLine::new();
        dl.initialize(10.0, 1.0).unwrap();

        dl.write(3, 0.25, -0.5);
        assert_eq!(dl.left()[3], 0.25);
        assert_eq!(dl.right()[3], -0.5);
        // Writing does not move the head.
        assert_eq!(dl.head(), 0);
    }

    #[test]
    fn test_head_wraps_at_capacity() {
        let mut dl = StereoDelayLine::new();
        dl.initialize(4.0, 1.0).unwrap();

        for expected in [1, 2, 3, 0, 1] {
            dl.advance_head();
            assert_eq!(dl.head(), expected);
        }
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut dl = StereoDelayLine::new();
        dl.initialize(100.0, 1.0).unwrap();
        dl.advance_head();

        dl.release();
        assert!(!dl.is_allocated());
        assert_eq!(dl.head(), 0);
        assert_eq!(dl.right().len(), 0);

        dl.release();
        assert!(!dl.is_allocated());

        // Advancing a released line must not panic or move the head.
        dl.advance_head();
        assert_eq!(dl.head(), 0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut dl = StereoDelayLine::new();
        dl.initialize(8.0, 1.0).unwrap();
        dl.write(0, 1.0, 1.0);
        dl.advance_head();

        dl.clear();
        assert_eq!(dl.len(), 8);
        assert_eq!(dl.head(), 0);
        assert_eq!(dl.left()[0], 0.0);
    }
}
