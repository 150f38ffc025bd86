//! # Fractional Tap Resolver
//!
//! The smoothed delay time is almost never a whole number of samples, so
//! the read position usually falls *between* two stored samples. We
//! reconstruct the value there with two-tap linear interpolation:
//!
//! ```text
//! base  = floor(position)
//! next  = base + 1          (wrapped to 0 at the end of the buffer)
//! phase = position - base   (0.0 ..< 1.0)
//!
//! value = (1 - phase) * buffer[base] + phase * buffer[next]
//! ```
//!
//! For position 441.3: 70% of slot 441 plus 30% of slot 442. Because the
//! read position glides continuously while the delay time is smoothed,
//! the output glides with it instead of jumping between whole samples.
//!
//! Note that `next` is one slot *later* in the buffer, i.e. one sample
//! *newer* in time. The position here is an absolute index into the ring
//! buffer, not a distance behind the write head.

/// A left/right sample pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

/// Read both channels at a fractional absolute position.
///
/// `left` and `right` must have the same length; that length is the ring
/// size. Positions outside `[0, len)` (or NaN) are a caller bug: they trip
/// a debug assertion and are clamped into range rather than reading out of
/// bounds. Empty buffers read as silence.
#[inline]
pub fn resolve(left: &[f32], right: &[f32], read_position: f32) -> StereoFrame {
    let len = left.len().min(right.len());
    if len == 0 {
        return StereoFrame::default();
    }

    nih_plug::nih_debug_assert!(read_position >= 0.0 && read_position < len as f32);
    let position = if read_position.is_nan() || read_position < 0.0 {
        0.0
    } else if read_position >= len as f32 {
        (len - 1) as f32
    } else {
        read_position
    };

    let base = position as usize;
    let mut next = base + 1;
    if next >= len {
        next = 0;
    }
    let phase = position - base as f32;

    StereoFrame {
        left: (1.0 - phase) * left[base] + phase * left[next],
        right: (1.0 - phase) * right[base] + phase * right[next],
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Whole-sample positions must return the stored value untouched.
    #[test]
    fn test_integer_position_is_exact() {
        let left = [0.1, 0.2, 0.3, 0.4];
        let right = [-0.1, -0.2, -0.3, -0.4];

        for (i, (&l, &r)) in left.iter().zip(&right).enumerate() {
            let frame = resolve(&left, &right, i as f32);
            assert_eq!(frame.left, l, "Left mismatch at {i}");
            assert_eq!(frame.right, r, "Right mismatch at {i}");
        }
    }

    #[test]
    fn test_halfway_blends_neighbours() {
        let left = [0.0, 1.0, 0.0];
        let right = [2.0, 4.0, 0.0];

        let frame = resolve(&left, &right, 0.5);
        assert!((frame.left - 0.5).abs() < 1e-6, "Got {}", frame.left);
        assert!((frame.right - 3.0).abs() < 1e-6, "Got {}", frame.right);

        let frame = resolve(&left, &right, 1.25);
        assert!((frame.left - 0.75).abs() < 1e-6, "Got {}", frame.left);
    }

    /// At the last slot the second tap has to come from slot 0, not from
    /// one past the end.
    #[test]
    fn test_last_slot_wraps_to_first() {
        let left = [1.0, 0.0, 0.0, 3.0];
        let right = [-1.0, 0.0, 0.0, 5.0];

        let frame = resolve(&left, &right, 3.5);
        assert!((frame.left - 2.0).abs() < 1e-6, "Got {}", frame.left);
        assert!((frame.right - 2.0).abs() < 1e-6, "Got {}", frame.right);

        let frame = resolve(&left, &right, 3.0);
        assert_eq!(frame.left, 3.0);
    }

    /// Out-of-range positions are clamped instead of indexing past the end.
    #[test]
    fn test_out_of_range_position_is_clamped() {
        let left = [1.0, 2.0, 3.0, 4.0];
        let right = [5.0, 6.0, 7.0, 8.0];

        assert_eq!(resolve(&left, &right, 10.0).left, 4.0);
        assert_eq!(resolve(&left, &right, -2.0).right, 5.0);
        assert_eq!(resolve(&left, &right, f32::NAN).left, 1.0);
    }

    #[test]
    fn test_empty_buffer_is_silent() {
        assert_eq!(resolve(&[], &[], 0.0), StereoFrame::default());
    }

    #[test]
    fn test_silence_in_silence_out() {
        let silence = [0.0; 64];
        for position in [0.0, 10.5, 33.3, 63.9] {
            let frame = resolve(&silence, &silence, position);
            assert_eq!(frame, StereoFrame::default(), "Position {position}");
        }
    }
}
