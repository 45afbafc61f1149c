use std::time::Duration;

use crate::debounce::{SymbolDebouncer, SymbolPress};
use crate::error::{Result, ToneLinkError};
use crate::frame::AudioFrame;
use crate::framing::MessageAssembler;
use crate::gate::{SignalGate, Throttle};
use crate::spectrum::{AnalyzerConfig, SpectralAnalyzer};

/// Tuning for the streaming decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub analyzer: AnalyzerConfig,
    /// RMS below which a frame is skipped as silence
    pub noise_floor_rms: f32,
    /// Minimum spacing between repeated quiet/no-match diagnostics
    pub diagnostic_cooldown: Duration,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            noise_floor_rms: crate::NOISE_FLOOR_RMS,
            diagnostic_cooldown: crate::DIAGNOSTIC_COOLDOWN,
        }
    }
}

/// A symbol detection with its position on the stream clock
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeEvent {
    pub symbol: char,
    /// Stream time of the start of the analysis frame
    pub timestamp: Duration,
    pub confidence: f32,
}

/// Result of analyzing one frame of audio
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// A symbol was recognized
    Symbol(DecodeEvent),
    /// Frame energy was below the noise floor; `reported` marks the frames
    /// whose diagnostic cleared the cooldown throttle
    Quiet { rms: f32, reported: bool },
    /// Energy present but the two dominant peaks match no symbol
    Undetected { strongest: (f32, f32), reported: bool },
}

/// Frame-by-frame tone decoder for live capture.
///
/// Each pushed frame is gated on RMS, analyzed, and classified. Timestamps
/// come from the stream clock (samples consumed so far over the sample
/// rate), not wall time, so replaying a recording faster than real time
/// decodes identically. A held tone produces one event per frame; callers
/// wanting one event per keypress layer a `SymbolDebouncer` on top.
pub struct StreamDecoder {
    config: DecoderConfig,
    gate: SignalGate,
    analyzer: SpectralAnalyzer,
    throttle: Throttle,
    samples_consumed: u64,
    last_symbol: Option<char>,
}

impl StreamDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        if config.noise_floor_rms < 0.0 {
            return Err(ToneLinkError::InvalidConfig(
                "noise floor must be non-negative".to_string(),
            ));
        }
        let analyzer = SpectralAnalyzer::new(config.analyzer)?;
        Ok(Self {
            gate: SignalGate::new(config.noise_floor_rms),
            analyzer,
            throttle: Throttle::new(config.diagnostic_cooldown),
            samples_consumed: 0,
            last_symbol: None,
            config,
        })
    }

    /// Decode one captured frame, rejecting frames at the wrong rate
    pub fn push_frame(&mut self, frame: &AudioFrame) -> Result<DecodeOutcome> {
        let expected = self.config.analyzer.sample_rate;
        if frame.sample_rate != expected {
            return Err(ToneLinkError::SampleRateMismatch {
                expected,
                actual: frame.sample_rate,
            });
        }
        self.push_samples(&frame.samples)
    }

    /// Decode one frame of raw samples at the configured rate. This is the
    /// capture-callback entry point.
    pub fn push_samples(&mut self, samples: &[i16]) -> Result<DecodeOutcome> {
        let t = self.stream_position();
        self.samples_consumed += samples.len() as u64;

        if !self.gate.should_analyze(samples) {
            let rms = SignalGate::rms(samples);
            let reported = self.throttle.poll(t);
            if reported {
                log::debug!("signal too quiet, rms: {:.1}", rms);
            }
            return Ok(DecodeOutcome::Quiet { rms, reported });
        }

        let reading = self.analyzer.analyze(samples)?;
        match reading.symbol {
            Some(symbol) => {
                self.last_symbol = Some(symbol);
                Ok(DecodeOutcome::Symbol(DecodeEvent {
                    symbol,
                    timestamp: t,
                    confidence: reading.confidence,
                }))
            }
            None => {
                let strongest = (
                    reading.peaks[0].frequency_hz,
                    reading.peaks[1].frequency_hz,
                );
                let reported = self.throttle.poll(t);
                if reported {
                    log::debug!(
                        "no symbol match, strongest frequencies: {:.1} Hz, {:.1} Hz",
                        strongest.0,
                        strongest.1
                    );
                }
                Ok(DecodeOutcome::Undetected { strongest, reported })
            }
        }
    }

    /// Current position on the stream clock
    pub fn stream_position(&self) -> Duration {
        let rate = self.config.analyzer.sample_rate;
        Duration::from_secs_f64(self.samples_consumed as f64 / rate as f64)
    }

    /// Most recently detected symbol
    pub fn last_symbol(&self) -> Option<char> {
        self.last_symbol
    }

    /// Rewind the stream clock and re-arm the diagnostics
    pub fn reset(&mut self) {
        self.samples_consumed = 0;
        self.last_symbol = None;
        self.throttle.reset();
    }
}

/// Counts from one decoded recording
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport {
    /// Debounced key presses in stream order
    pub presses: Vec<SymbolPress>,
    /// Commands whose messages parsed cleanly
    pub commands: Vec<char>,
    /// Messages discarded by the assembler or parser
    pub framing_errors: usize,
}

/// Whole-recording decoder: StreamDecoder, debouncer, and message assembly
/// in one pass.
pub struct CommandDecoder {
    stream: StreamDecoder,
    debouncer: SymbolDebouncer,
    assembler: MessageAssembler,
    fft_size: usize,
    sample_rate: u32,
}

impl CommandDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        let fft_size = config.analyzer.fft_size;
        let sample_rate = config.analyzer.sample_rate;
        Ok(Self {
            stream: StreamDecoder::new(config)?,
            debouncer: SymbolDebouncer::default(),
            assembler: MessageAssembler::new(),
            fft_size,
            sample_rate,
        })
    }

    /// Decode a complete recording. Each call stands alone; prior state is
    /// discarded so the decoder can be reused across recordings.
    pub fn decode(&mut self, frame: &AudioFrame) -> Result<DecodeReport> {
        if frame.sample_rate != self.sample_rate {
            return Err(ToneLinkError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: frame.sample_rate,
            });
        }
        self.stream.reset();
        self.debouncer.reset();
        self.assembler.reset();

        let mut report = DecodeReport {
            presses: Vec::new(),
            commands: Vec::new(),
            framing_errors: 0,
        };

        for chunk in frame.samples.chunks(self.fft_size) {
            let observation = match self.stream.push_samples(chunk)? {
                DecodeOutcome::Symbol(event) => Some((event.symbol, event.timestamp)),
                DecodeOutcome::Quiet { .. } | DecodeOutcome::Undetected { .. } => None,
            };
            if let Some(press) = self.debouncer.push(observation) {
                self.accept(press, &mut report);
            }
        }
        if let Some(press) = self.debouncer.flush() {
            self.accept(press, &mut report);
        }
        // A collection still open here lost its END to truncation; a live
        // stream may always be mid-message, so it is dropped without comment.

        Ok(report)
    }

    fn accept(&mut self, press: SymbolPress, report: &mut DecodeReport) {
        let symbol = press.symbol;
        report.presses.push(press);
        match self.assembler.push(symbol) {
            Some(Ok(command)) => report.commands.push(command),
            Some(Err(err)) => {
                log::warn!("discarding malformed message: {}", err);
                report.framing_errors += 1;
            }
            None => {}
        }
    }
}
