//! # Glide Delay: an AU/VST3/CLAP Stereo Delay
//!
//! A stereo feedback delay built with
//! [nih-plug](https://github.com/robbert-vdh/nih-plug). Turning the delay
//! time knob does not jump the read head; it glides toward the new
//! position, bending the pitch of the echoes like a tape machine.
//!
//! ## Signal Flow
//!
//! ```text
//! Input ──┬──────────────────────────────────── × (1 - dry/wet) ───┐
//!         │                                                        │
//!         └──►(+)──► [Stereo Delay Line] ──► interpolated tap      │
//!              ▲              ▲                     │              │
//!              │      read position glides          ├─ × dry/wet ─►(+)──► Output
//!              │      toward the delay time         │
//!              └──────── × feedback ◄───────────────┘
//! ```
//!
//! The plugin itself is a thin shell: it owns the parameters, sizes the
//! engine in `initialize()` and hands every block to
//! [`DelayProcessor`](dsp::processor::DelayProcessor).

pub mod config;
pub mod dsp;
pub mod error;
pub mod params;

// Lets the unit tests check that processing never allocates. With the
// `assert_process_allocs` feature nih-plug installs its own allocator
// instead, and only one global allocator can exist.
#[cfg(all(test, not(feature = "assert_process_allocs")))]
#[global_allocator]
static TEST_ALLOCATOR: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

use std::num::NonZeroU32;
use std::sync::Arc;

use config::EngineConfig;
use dsp::processor::DelayProcessor;
use nih_plug::prelude::*;
use params::DelayParams;

/// The main plugin struct.
///
/// Parameters are shared with the host and the editor through an `Arc`
/// and read from any thread. The processor (delay buffers, glide and
/// feedback state) is owned by the audio thread and only touched in
/// `initialize()`, `reset()`, `process()` and `deactivate()`, which the
/// host never runs concurrently.
struct GlideDelay {
    params: Arc<DelayParams>,
    processor: DelayProcessor,
    /// Main input channel count of the active layout. Output channels past
    /// this have no input and are silenced.
    num_input_channels: usize,
}

impl Default for GlideDelay {
    fn default() -> Self {
        Self {
            params: Arc::new(DelayParams::default()),
            // No buffers yet; they are sized in initialize() once the
            // sample rate is known.
            processor: DelayProcessor::new(EngineConfig::default()),
            num_input_channels: 2,
        }
    }
}

impl Plugin for GlideDelay {
    const NAME: &'static str = "Glide Delay";
    const VENDOR: &'static str = "Glide Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo only. The engine keeps one shared write head for a left and
    // a right buffer, so there is no mono variant.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // Parameter changes land on the exact sample they were automated at.
    // The engine reads parameters once per sample, so this is what makes
    // automation click-free at block boundaries.
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Allocate the delay buffers for the host's sample rate.
    ///
    /// Returning `false` tells the host this configuration can't be used;
    /// it may try again with a different one.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let sample_rate = buffer_config.sample_rate;
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            nih_error!("Refusing to initialize with a sample rate of {sample_rate} Hz");
            return false;
        }

        self.num_input_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get() as usize)
            .unwrap_or(0);

        let delay_time = self.params.delay_time.value();
        match self.processor.prepare(sample_rate, delay_time) {
            Ok(capacity) => {
                nih_log!(
                    "Delay line ready: {capacity} samples at {sample_rate} Hz, blocks of up to {} samples",
                    buffer_config.max_buffer_size
                );
                true
            }
            Err(err) => {
                nih_error!("Could not prepare the delay: {err}");
                false
            }
        }
    }

    /// Called when playback restarts. Clears the echoes so old audio does
    /// not bleed into the next take. Runs on the audio thread, so this
    /// must not (and does not) allocate.
    fn reset(&mut self) {
        self.processor.reset(self.params.delay_time.value());
    }

    /// The host is done with the plugin for now; free the buffers. The
    /// next activation goes through `initialize()` again.
    fn deactivate(&mut self) {
        self.processor.release();
    }

    /// The audio callback. The host calls this for every block, in place:
    /// each channel slice holds the input on entry and the output on exit.
    ///
    /// # Arguments
    ///
    /// * `buffer` - The main input/output channels, processed in place.
    /// * `_aux` - Auxiliary buffers (sidechain inputs, etc.). Unused.
    /// * `_context` - Process context with transport info. Unused.
    ///
    /// # Steps
    ///
    /// 1. **Guard** the whole block with `no_denormals`, so the decaying
    ///    feedback tail is flushed to zero instead of crawling through
    ///    subnormal floats. The previous float mode is restored afterwards.
    /// 2. **Silence** every output channel past the input channel count;
    ///    they have no input to carry. The engine does this first thing in
    ///    [`process_block`](DelayProcessor::process_block).
    /// 3. **Snapshot** the parameters once per sample through
    ///    [`DelayParams::snapshot`], so sample-accurate automation lands
    ///    on the sample it was written for.
    /// 4. **Run** the per-sample delay step on each left/right pair: glide
    ///    the delay time, write input plus feedback, read the interpolated
    ///    tap, keep it as the next feedback and mix it with the dry signal.
    /// 5. **Report** a tail of `delay * -3 / log10(feedback)` samples: the
    ///    number of repeats until the echoes fall 60 dB, each one delay
    ///    apart. With (near) zero feedback the tail is a single delay.
    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let params = &self.params;
        let processor = &mut self.processor;
        let num_input_channels = self.num_input_channels;

        // A long feedback tail decays into subnormal floats; flush them to
        // zero while the loop runs.
        no_denormals::no_denormals(|| {
            processor.process_block(buffer.as_slice(), num_input_channels, || {
                params.snapshot()
            });
        });

        // Keep the host calling process() after the input stops, or the
        // echoes would be cut off.
        ProcessStatus::Tail(self.processor.tail_samples(self.params.feedback.value()))
    }
}

impl ClapPlugin for GlideDelay {
    const CLAP_ID: &'static str = "com.glide-audio.glide-delay";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A stereo feedback delay with gliding delay time");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Delay,
    ];
}

impl Vst3Plugin for GlideDelay {
    // `*b"..."` turns the 16-character ASCII literal into a `[u8; 16]`.
    const VST3_CLASS_ID: [u8; 16] = *b"GlideAudioDelay1";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Delay];
}

nih_export_clap!(GlideDelay);
nih_export_vst3!(GlideDelay);

// AUv2 entry point (`GetPluginFactoryAUV2`) for Logic Pro, wrapping the
// CLAP export above.
clap_wrapper::export_auv2!();
