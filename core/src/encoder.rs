use crate::error::Result;
use crate::frame::AudioFrame;
use crate::framing::MessageFramer;
use crate::synth::ToneSynthesizer;

/// Renders framed commands as a playable tone sequence.
///
/// Each message symbol becomes its full-duration tone followed by a short
/// silence. Tones never overlap: a symbol's tone fully elapses before the
/// next begins, and the trailing silence gives a receiving debouncer the gap
/// it needs to release the final symbol.
pub struct CommandEncoder {
    synth: ToneSynthesizer,
    tone_duration: f32,
    gap: f32,
}

impl CommandEncoder {
    pub fn new() -> Self {
        Self::with_params(
            crate::SAMPLE_RATE,
            crate::TONE_AMPLITUDE,
            crate::TONE_DURATION,
            crate::INTER_SYMBOL_GAP,
        )
    }

    pub fn with_params(
        sample_rate: u32,
        amplitude: f32,
        tone_duration_secs: f32,
        gap_secs: f32,
    ) -> Self {
        Self {
            synth: ToneSynthesizer::new(sample_rate, amplitude),
            tone_duration: tone_duration_secs,
            gap: gap_secs,
        }
    }

    /// Frame one command and render the whole message as audio
    pub fn encode(&self, command: char) -> Result<AudioFrame> {
        let message = MessageFramer::build(command)?;
        self.encode_symbols(&message)
    }

    /// Render an already framed symbol sequence
    pub fn encode_symbols(&self, symbols: &[char]) -> Result<AudioFrame> {
        let mut samples = Vec::new();
        for symbol in symbols {
            let tone = self.synth.synthesize(*symbol, self.tone_duration)?;
            samples.extend_from_slice(&tone.samples);
            samples.extend_from_slice(&self.synth.silence(self.gap).samples);
        }
        Ok(AudioFrame::new(samples, self.synth.sample_rate()))
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}
