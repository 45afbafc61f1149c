//! Acoustic command link over DTMF tone pairs
//!
//! Commands travel as checksummed `#...*` symbol messages; each symbol is a
//! low+high sine pair recovered by FFT peak analysis

pub mod error;
pub mod symbols;
pub mod frame;
pub mod synth;
pub mod spectrum;
pub mod gate;
pub mod framing;
pub mod debounce;
pub mod encoder;
pub mod decoder;

pub use debounce::{SymbolDebouncer, SymbolPress};
pub use decoder::{
    CommandDecoder, DecodeEvent, DecodeOutcome, DecodeReport, DecoderConfig, StreamDecoder,
};
pub use encoder::CommandEncoder;
pub use error::{Result, ToneLinkError};
pub use frame::AudioFrame;
pub use framing::{MessageAssembler, MessageFramer};
pub use gate::{SignalGate, Throttle};
pub use spectrum::{AnalyzerConfig, SpectralAnalyzer, SpectralReading, SpectrumPeak};
pub use symbols::{frequency_pair_of, symbol_of, FrequencyPair, SYMBOL_TABLE};
pub use synth::ToneSynthesizer;

use std::time::Duration;

// Signal configuration
pub const SAMPLE_RATE: u32 = 44_100;
pub const TONE_DURATION: f32 = 0.4; // seconds
pub const TONE_AMPLITUDE: f32 = 30_000.0;
pub const INTER_SYMBOL_GAP: f32 = 0.15; // seconds

// Analysis configuration
pub const FFT_SIZE: usize = 2_048;
pub const FREQUENCY_TOLERANCE_HZ: f32 = 20.0;
pub const ANALYSIS_CUTOFF_HZ: f32 = 500.0;

// Decoder configuration
pub const NOISE_FLOOR_RMS: f32 = 1_000.0;
pub const DIAGNOSTIC_COOLDOWN: Duration = Duration::from_secs(3);
pub const DEBOUNCE_MIN_PRESS_FRAMES: usize = 2;
pub const DEBOUNCE_MIN_GAP_FRAMES: usize = 2;
