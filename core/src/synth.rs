use crate::error::Result;
use crate::frame::AudioFrame;
use crate::symbols::frequency_pair_of;
use std::f32::consts::PI;

/// Renders DTMF symbols as dual-tone PCM audio.
///
/// Each call starts both sine phases at zero; there is no phase continuity
/// across calls, so back-to-back tones click at the boundary. Known
/// limitation: command messages separate symbols with silence, which masks it.
pub struct ToneSynthesizer {
    sample_rate: u32,
    amplitude: f32,
}

impl ToneSynthesizer {
    pub fn new(sample_rate: u32, amplitude: f32) -> Self {
        Self {
            sample_rate,
            amplitude,
        }
    }

    /// Render one symbol as `round(duration_secs * sample_rate)` samples,
    /// summing the symbol's two tones at half amplitude each and clamping to
    /// the 16-bit range.
    pub fn synthesize(&self, symbol: char, duration_secs: f32) -> Result<AudioFrame> {
        let pair = frequency_pair_of(symbol)?;
        let count = self.sample_count(duration_secs);
        let rate = self.sample_rate as f32;
        let low = pair.low as f32;
        let high = pair.high as f32;

        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let t = i as f32 / rate;
            let value =
                self.amplitude * 0.5 * ((2.0 * PI * low * t).sin() + (2.0 * PI * high * t).sin());
            samples.push(value.clamp(i16::MIN as f32, i16::MAX as f32) as i16);
        }

        Ok(AudioFrame::new(samples, self.sample_rate))
    }

    /// Render silence with the same length rule as `synthesize`
    pub fn silence(&self, duration_secs: f32) -> AudioFrame {
        AudioFrame::new(vec![0; self.sample_count(duration_secs)], self.sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn sample_count(&self, duration_secs: f32) -> usize {
        (duration_secs * self.sample_rate as f32).round().max(0.0) as usize
    }
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self::new(crate::SAMPLE_RATE, crate::TONE_AMPLITUDE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToneLinkError;

    #[test]
    fn test_synthesize_exact_length() {
        let synth = ToneSynthesizer::new(44100, 30000.0);
        let frame = synth.synthesize('5', 0.4).unwrap();
        assert_eq!(frame.len(), 17640, "0.4s at 44.1kHz is 17640 samples");
        assert_eq!(frame.sample_rate, 44100);
    }

    #[test]
    fn test_synthesize_rounds_fractional_lengths() {
        let synth = ToneSynthesizer::new(8000, 10000.0);
        // 0.1001s at 8kHz = 800.8 samples, rounds to 801
        let frame = synth.synthesize('1', 0.1001).unwrap();
        assert_eq!(frame.len(), 801);
    }

    #[test]
    fn test_synthesize_non_positive_duration_is_empty() {
        let synth = ToneSynthesizer::new(44100, 30000.0);
        assert!(synth.synthesize('1', 0.0).unwrap().is_empty());
        assert!(synth.synthesize('1', -1.0).unwrap().is_empty());
    }

    #[test]
    fn test_synthesize_unknown_symbol() {
        let synth = ToneSynthesizer::new(44100, 30000.0);
        match synth.synthesize('Q', 0.4) {
            Err(ToneLinkError::UnknownSymbol('Q')) => {}
            other => panic!("Expected UnknownSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_synthesize_amplitude_bounds() {
        let synth = ToneSynthesizer::new(44100, 30000.0);
        let frame = synth.synthesize('8', 0.4).unwrap();

        let max_abs = frame
            .samples
            .iter()
            .map(|&s| (s as i32).abs())
            .max()
            .unwrap();

        // Two half-amplitude tones can never exceed the configured amplitude,
        // and over 0.4s their peaks align often enough to get close to it.
        assert!(max_abs <= 30000, "Peak {} exceeds amplitude", max_abs);
        assert!(max_abs > 21000, "Peak {} suspiciously small", max_abs);
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let synth = ToneSynthesizer::new(44100, 30000.0);
        let a = synth.synthesize('3', 0.1).unwrap();
        let b = synth.synthesize('3', 0.1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthesize_alias_equals_keypad_symbol() {
        // 'F' reuses the '1' tone pair, so the rendered audio is identical.
        let synth = ToneSynthesizer::new(44100, 30000.0);
        let alias = synth.synthesize('F', 0.1).unwrap();
        let keypad = synth.synthesize('1', 0.1).unwrap();
        assert_eq!(alias, keypad);
    }

    #[test]
    fn test_silence_is_zeroed() {
        let synth = ToneSynthesizer::new(44100, 30000.0);
        let frame = synth.silence(0.15);
        assert_eq!(frame.len(), 6615);
        assert!(frame.samples.iter().all(|&s| s == 0));
    }
}
