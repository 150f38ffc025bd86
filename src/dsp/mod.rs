//! # DSP
//!
//! The real-time core of the delay. Nothing in here depends on the plugin
//! framework's parameter types; the processor only ever sees plain
//! [`DelaySettings`](crate::params::DelaySettings) values.
//!
//! - **`delay_line`**: the stereo ring buffer and its write head.
//! - **`interpolation`**: reads the ring buffer at fractional positions.
//! - **`smoother`**: the one-pole glide applied to the delay time.
//! - **`processor`**: runs the per-sample delay algorithm over a block.

pub mod delay_line;
pub mod interpolation;
pub mod processor;
pub mod smoother;
