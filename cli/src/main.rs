use clap::{Parser, Subcommand};
use hound::WavSpec;
use std::fs::File;
use std::path::PathBuf;
use tonelink_core::{
    AnalyzerConfig, AudioFrame, CommandDecoder, CommandEncoder, DecoderConfig, MessageFramer,
    ToneLinkError,
};

#[derive(Parser)]
#[command(name = "tonelink")]
#[command(about = "DTMF command link: render commands to audio and decode recordings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one command as a WAV tone sequence
    Encode {
        /// Command symbol from the DTMF table (digits, *, #, F, B, L, R)
        #[arg(value_name = "COMMAND")]
        command: char,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Tone duration in seconds
        #[arg(long, default_value_t = tonelink_core::TONE_DURATION)]
        duration: f32,

        /// Tone amplitude in 16-bit sample units
        #[arg(long, default_value_t = tonelink_core::TONE_AMPLITUDE)]
        amplitude: f32,

        /// Silence between symbols in seconds
        #[arg(long, default_value_t = tonelink_core::INTER_SYMBOL_GAP)]
        gap: f32,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = tonelink_core::SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Decode the commands recorded in a WAV file
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Analysis window size in samples (power of two)
        #[arg(long, default_value_t = tonelink_core::FFT_SIZE)]
        fft_size: usize,

        /// Peak matching tolerance in Hz
        #[arg(long, default_value_t = tonelink_core::FREQUENCY_TOLERANCE_HZ)]
        tolerance: f32,

        /// RMS below which a frame counts as silence
        #[arg(long, default_value_t = tonelink_core::NOISE_FLOOR_RMS)]
        noise_floor: f32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            command,
            output,
            duration,
            amplitude,
            gap,
            sample_rate,
        } => encode_command(command, &output, duration, amplitude, gap, sample_rate)?,
        Commands::Decode {
            input,
            fft_size,
            tolerance,
            noise_floor,
        } => decode_command(&input, fft_size, tolerance, noise_floor)?,
    }

    Ok(())
}

fn encode_command(
    command: char,
    output_path: &PathBuf,
    duration: f32,
    amplitude: f32,
    gap: f32,
    sample_rate: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let message: String = MessageFramer::build(command)?.into_iter().collect();
    println!("Encoding command '{}' as message {}", command, message);

    let encoder = CommandEncoder::with_params(sample_rate, amplitude, duration, gap);
    let audio = encoder.encode(command)?;
    println!(
        "Rendered {} samples at {} Hz",
        audio.samples.len(),
        audio.sample_rate
    );

    // Write WAV file (mono 16-bit PCM)
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let file = File::create(output_path)?;
    let mut writer = hound::WavWriter::new(file, spec)?;
    for sample in audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    println!("Wrote {}", output_path.display());
    Ok(())
}

fn decode_command(
    input_path: &PathBuf,
    fft_size: usize,
    tolerance: f32,
    noise_floor: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    // Read WAV file
    let file = File::open(input_path)?;
    let mut reader = hound::WavReader::new(file)?;

    let spec = reader.spec();
    println!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(format!(
            "Unsupported sample format: {} bits ({:?})",
            spec.bits_per_sample, spec.sample_format
        )
        .into());
    }

    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
    let samples: Vec<i16> = if spec.channels > 1 {
        log::warn!(
            "{} channels in input, decoding the first channel only",
            spec.channels
        );
        samples
            .iter()
            .step_by(spec.channels as usize)
            .copied()
            .collect()
    } else {
        samples
    };

    if samples.is_empty() {
        return Err(ToneLinkError::CaptureUnavailable(format!(
            "{} contains no audio samples",
            input_path.display()
        ))
        .into());
    }
    println!("Extracted {} samples", samples.len());

    // Decode at the file's own sample rate.
    let config = DecoderConfig {
        analyzer: AnalyzerConfig {
            sample_rate: spec.sample_rate,
            fft_size,
            tolerance_hz: tolerance,
            ..AnalyzerConfig::default()
        },
        noise_floor_rms: noise_floor,
        ..DecoderConfig::default()
    };
    let mut decoder = CommandDecoder::new(config)?;
    let report = decoder.decode(&AudioFrame::new(samples, spec.sample_rate))?;

    for press in &report.presses {
        println!(
            "{:8.3}s  '{}'  ({} frames)",
            press.start.as_secs_f64(),
            press.symbol,
            press.frames
        );
    }

    if report.commands.is_empty() {
        println!("No commands decoded");
    } else {
        let commands: String = report.commands.iter().collect();
        println!("Decoded {} command(s): {}", report.commands.len(), commands);
    }
    if report.framing_errors > 0 {
        println!("{} malformed message(s) discarded", report.framing_errors);
    }

    Ok(())
}
