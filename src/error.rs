//! Errors raised while preparing the delay engine.
//!
//! Nothing on the audio path is fallible. Everything that can go wrong
//! happens once, in `initialize()`, when the delay buffers are sized and
//! allocated for the host's sample rate.

use std::collections::TryReserveError;

use thiserror::Error;

/// Why the delay buffers could not be prepared.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The host handed us a sample rate that is zero, negative or not a
    /// number.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// `floor(sample_rate * max_delay_seconds)` came out as zero samples.
    #[error("delay buffer would hold no samples ({sample_rate} Hz x {max_delay_seconds} s)")]
    ZeroCapacity {
        sample_rate: f32,
        max_delay_seconds: f32,
    },

    /// The allocator refused the delay buffers.
    #[error("failed to allocate delay buffers: {0}")]
    Allocation(#[from] TryReserveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_values() {
        let err = PrepareError::InvalidSampleRate(-1.0);
        assert_eq!(err.to_string(), "invalid sample rate: -1 Hz");

        let err = PrepareError::ZeroCapacity {
            sample_rate: 0.25,
            max_delay_seconds: 2.0,
        };
        assert!(
            err.to_string().contains("0.25 Hz"),
            "Message should mention the sample rate, got {err}"
        );
    }

    #[test]
    fn test_allocation_error_converts() {
        let mut v: Vec<f32> = Vec::new();
        let reserve_err = v
            .try_reserve_exact(usize::MAX)
            .expect_err("reserving usize::MAX floats must fail");

        let err: PrepareError = reserve_err.into();
        assert!(matches!(err, PrepareError::Allocation(_)));
    }
}
