use crate::error::{Result, ToneLinkError};
use crate::symbols::symbol_of;
use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Tuning for one spectral analyzer instance
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerConfig {
    pub sample_rate: u32,
    pub fft_size: usize,
    pub tolerance_hz: f32,
    pub low_cutoff_hz: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::SAMPLE_RATE,
            fft_size: crate::FFT_SIZE,
            tolerance_hz: crate::FREQUENCY_TOLERANCE_HZ,
            low_cutoff_hz: crate::ANALYSIS_CUTOFF_HZ,
        }
    }
}

impl AnalyzerConfig {
    /// Width of one FFT bin in Hz
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Reject combinations the detector cannot honor.
    ///
    /// The tolerance must cover at least half a bin: a tone is reported at the
    /// nearest bin center, up to half a bin width away from its true
    /// frequency, so a tighter tolerance would reject legitimate tones.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneLinkError::InvalidConfig(
                "sample rate must be positive".to_string(),
            ));
        }
        if self.fft_size == 0 || !self.fft_size.is_power_of_two() {
            return Err(ToneLinkError::InvalidConfig(format!(
                "fft size must be a power of two, got {}",
                self.fft_size
            )));
        }
        if !(self.tolerance_hz > 0.0) {
            return Err(ToneLinkError::InvalidConfig(
                "tolerance must be positive".to_string(),
            ));
        }
        let half_bin = self.bin_width_hz() / 2.0;
        if self.tolerance_hz < half_bin {
            return Err(ToneLinkError::InvalidConfig(format!(
                "tolerance {} Hz is below half the bin width ({:.2} Hz); tones rounding to the nearest bin would be missed",
                self.tolerance_hz, half_bin
            )));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if self.low_cutoff_hz >= nyquist {
            return Err(ToneLinkError::InvalidConfig(format!(
                "low cutoff {} Hz leaves no analyzable bins below Nyquist ({} Hz)",
                self.low_cutoff_hz, nyquist
            )));
        }
        Ok(())
    }
}

/// One bin of the magnitude spectrum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectrumPeak {
    pub bin: usize,
    pub frequency_hz: f32,
    pub magnitude: f32,
}

/// Result of classifying one analysis window
#[derive(Debug, Clone)]
pub struct SpectralReading {
    /// The two strongest bins at or above the low cutoff, strongest first
    pub peaks: [SpectrumPeak; 2],
    /// Table match for the peak pair, `None` when nothing fits the tolerance
    pub symbol: Option<char>,
    /// Weaker-peak magnitude normalized to the input amplitude scale: a pure
    /// sine of amplitude A at a bin center scores close to A
    pub confidence: f32,
}

/// Windowed DTMF detector: real-input FFT, two-peak scan, table match.
///
/// The forward transform is planned once and its buffers reused, so a single
/// analyzer instance can run per capture callback without allocating.
pub struct SpectralAnalyzer {
    config: AnalyzerConfig,
    fft: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
}

impl SpectralAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let mut planner = RealFftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let spectrum = fft.make_output_vec();
        Ok(Self {
            config,
            fft,
            input: vec![0.0; config.fft_size],
            spectrum,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify one window of samples.
    ///
    /// The window is zero-padded (or truncated) to the FFT size, the one-sided
    /// magnitude spectrum computed with a rectangular window, and the two
    /// strongest bins at or above the low cutoff matched against the symbol
    /// table. A degenerate spectrum or an unmatched pair leaves `symbol` as
    /// `None`; neither is an error.
    pub fn analyze(&mut self, samples: &[i16]) -> Result<SpectralReading> {
        let n = self.config.fft_size;
        let copy = samples.len().min(n);
        for (slot, &sample) in self.input.iter_mut().zip(samples.iter()) {
            *slot = sample as f32;
        }
        for slot in self.input.iter_mut().skip(copy) {
            *slot = 0.0;
        }

        // The transform consumes the input buffer as scratch; it is refilled
        // in full on every call.
        self.fft
            .process(&mut self.input, &mut self.spectrum)
            .map_err(|e| ToneLinkError::FftError(format!("forward FFT failed: {:?}", e)))?;

        let bin_width = self.config.bin_width_hz();
        let mut peak1: Option<(usize, f32)> = None;
        let mut peak2: Option<(usize, f32)> = None;

        // Single ascending pass; strict comparisons keep the first bin that
        // reached a magnitude ahead of later ties.
        for k in 0..n / 2 {
            let frequency = k as f32 * bin_width;
            if frequency < self.config.low_cutoff_hz {
                continue;
            }
            let magnitude = self.spectrum[k].norm();
            match peak1 {
                Some((_, m1)) if magnitude <= m1 => match peak2 {
                    Some((_, m2)) if magnitude <= m2 => {}
                    _ => peak2 = Some((k, magnitude)),
                },
                _ => {
                    peak2 = peak1;
                    peak1 = Some((k, magnitude));
                }
            }
        }

        let ((k1, m1), (k2, m2)) = match (peak1, peak2) {
            (Some(first), Some(second)) => (first, second),
            _ => {
                return Ok(SpectralReading {
                    peaks: [SpectrumPeak::default(); 2],
                    symbol: None,
                    confidence: 0.0,
                });
            }
        };

        let peaks = [
            SpectrumPeak {
                bin: k1,
                frequency_hz: k1 as f32 * bin_width,
                magnitude: m1,
            },
            SpectrumPeak {
                bin: k2,
                frequency_hz: k2 as f32 * bin_width,
                magnitude: m2,
            },
        ];

        let confidence = 2.0 * m1.min(m2) / n as f32;
        let symbol = if m1 > 0.0 && m2 > 0.0 {
            symbol_of(
                peaks[0].frequency_hz,
                peaks[1].frequency_hz,
                self.config.tolerance_hz,
            )
        } else {
            None
        };

        Ok(SpectralReading {
            peaks,
            symbol,
            confidence,
        })
    }
}
