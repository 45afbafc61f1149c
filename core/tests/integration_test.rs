use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tonelink_core::{
    AnalyzerConfig, AudioFrame, CommandDecoder, CommandEncoder, DecoderConfig, SpectralAnalyzer,
    ToneSynthesizer, NOISE_FLOOR_RMS, SAMPLE_RATE, SYMBOL_TABLE, TONE_DURATION,
};

/// Alias symbols share a frequency pair with a keypad symbol, so over the air
/// they decode as the keypad partner.
fn canonical(symbol: char) -> char {
    match symbol {
        'F' => '1',
        'B' => '5',
        'L' => '9',
        'R' => '0',
        other => other,
    }
}

#[test]
fn test_synthesize_analyze_round_trip_all_symbols() {
    let mut analyzer =
        SpectralAnalyzer::new(AnalyzerConfig::default()).expect("Failed to create analyzer");
    let synth = ToneSynthesizer::default();

    for (symbol, _) in SYMBOL_TABLE.iter() {
        let tone = synth
            .synthesize(*symbol, TONE_DURATION)
            .expect("Failed to synthesize");
        let reading = analyzer
            .analyze(&tone.samples[..2048])
            .expect("Failed to analyze");

        assert_eq!(
            reading.symbol,
            Some(canonical(*symbol)),
            "Symbol '{}' did not round-trip",
            symbol
        );
        assert!(
            reading.confidence > NOISE_FLOOR_RMS,
            "Confidence {} too low for '{}'",
            reading.confidence,
            symbol
        );
    }
}

#[test]
fn test_round_trip_across_amplitudes() {
    let mut analyzer =
        SpectralAnalyzer::new(AnalyzerConfig::default()).expect("Failed to create analyzer");

    for amplitude in [5_000.0, 10_000.0, 20_000.0, 30_000.0] {
        let synth = ToneSynthesizer::new(SAMPLE_RATE, amplitude);
        let tone = synth
            .synthesize('5', TONE_DURATION)
            .expect("Failed to synthesize");
        let reading = analyzer
            .analyze(&tone.samples[..2048])
            .expect("Failed to analyze");

        assert_eq!(
            reading.symbol,
            Some('5'),
            "Detection failed at amplitude {}",
            amplitude
        );
        assert!(
            reading.confidence > NOISE_FLOOR_RMS,
            "Confidence {} below the noise floor at amplitude {}",
            reading.confidence,
            amplitude
        );
    }
}

#[test]
fn test_command_round_trip_clean() {
    let encoder = CommandEncoder::new();
    let audio = encoder.encode('7').expect("Failed to encode");
    println!("Generated {} audio samples", audio.samples.len());

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&audio).expect("Failed to decode");

    let pressed: Vec<char> = report.presses.iter().map(|p| p.symbol).collect();
    assert_eq!(pressed, vec!['#', '7', '5', '5', '*'], "Press sequence mismatch");
    assert_eq!(report.commands, vec!['7'], "Command mismatch");
    assert_eq!(report.framing_errors, 0);
}

#[test]
fn test_command_round_trip_with_noise() {
    let encoder = CommandEncoder::new();
    let mut audio = encoder.encode('7').expect("Failed to encode");

    // Additive white noise at roughly 20 dB SNR against the 15000 RMS
    // tone pair.
    let mut rng_state = 12345u32;
    for sample in audio.samples.iter_mut() {
        rng_state = rng_state.wrapping_mul(1664525).wrapping_add(1013904223);
        let noise = ((rng_state >> 16) as f32 / 65536.0 - 0.5) * 5_000.0;
        *sample = sample.saturating_add(noise as i16);
    }

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&audio).expect("Failed to decode");

    assert_eq!(report.commands, vec!['7'], "Command lost in noise");
    assert_eq!(report.framing_errors, 0);
}

#[test]
fn test_command_round_trip_with_gaussian_noise() {
    let encoder = CommandEncoder::new();
    let mut audio = encoder.encode('9').expect("Failed to encode");

    // Gaussian noise, sigma 1500 against the 15000 RMS tone pair (20 dB SNR).
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let normal = Normal::new(0.0f32, 1_500.0).expect("Failed to create distribution");
    for sample in audio.samples.iter_mut() {
        *sample = sample.saturating_add(normal.sample(&mut rng) as i16);
    }

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&audio).expect("Failed to decode");

    assert_eq!(report.commands, vec!['9'], "Command lost in Gaussian noise");
    assert_eq!(report.framing_errors, 0);
}

#[test]
fn test_two_commands_in_one_recording() {
    let encoder = CommandEncoder::new();
    let first = encoder.encode('7').expect("Failed to encode");
    let second = encoder.encode('9').expect("Failed to encode");

    let mut samples = first.samples;
    samples.extend_from_slice(&second.samples);
    let recording = AudioFrame::new(samples, SAMPLE_RATE);

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&recording).expect("Failed to decode");

    assert_eq!(report.commands, vec!['7', '9'], "Both commands should decode");
    assert_eq!(report.framing_errors, 0);
    assert_eq!(report.presses.len(), 10);
}

#[test]
fn test_repeated_digit_presses_stay_distinct() {
    // ordinal('5') is 53, so the message is # 5 5 3 * with back-to-back 5s.
    let encoder = CommandEncoder::new();
    let audio = encoder.encode('5').expect("Failed to encode");

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&audio).expect("Failed to decode");

    let pressed: Vec<char> = report.presses.iter().map(|p| p.symbol).collect();
    assert_eq!(
        pressed,
        vec!['#', '5', '5', '3', '*'],
        "Consecutive identical digits must stay separate presses"
    );
    assert_eq!(report.commands, vec!['5']);
}

#[test]
fn test_truncated_recording_yields_no_command() {
    let encoder = CommandEncoder::new();
    let audio = encoder.encode('7').expect("Failed to encode");

    // Cut the recording inside the third symbol's trailing gap, before the
    // checksum completes.
    let truncated = AudioFrame::new(audio.samples[..70_000].to_vec(), SAMPLE_RATE);

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&truncated).expect("Failed to decode");

    let pressed: Vec<char> = report.presses.iter().map(|p| p.symbol).collect();
    assert_eq!(pressed, vec!['#', '7', '5'], "Presses up to the cut still decode");
    assert!(report.commands.is_empty(), "No END, no command");
    assert_eq!(report.framing_errors, 0, "An open collection is not an error");
}

#[test]
fn test_alias_command_canonicalizes_over_the_air() {
    // 'F' shares its tones with '1', so the receiver hears # 1 7 0 * and the
    // checksum no longer matches. Senders wanting audio round trips use the
    // canonical symbols.
    let _ = env_logger::builder().is_test(true).try_init();

    let encoder = CommandEncoder::new();
    let audio = encoder.encode('F').expect("Failed to encode");

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&audio).expect("Failed to decode");

    let pressed: Vec<char> = report.presses.iter().map(|p| p.symbol).collect();
    assert_eq!(pressed, vec!['#', '1', '7', '0', '*']);
    assert!(report.commands.is_empty());
    assert_eq!(report.framing_errors, 1, "The canonicalized checksum fails once");
}

#[test]
fn test_quiet_recording_produces_nothing() {
    let recording = AudioFrame::new(vec![0i16; 2 * SAMPLE_RATE as usize], SAMPLE_RATE);

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&recording).expect("Failed to decode");

    assert!(report.presses.is_empty());
    assert!(report.commands.is_empty());
    assert_eq!(report.framing_errors, 0);
}

#[test]
fn test_command_round_trip_with_leading_and_trailing_silence() {
    let encoder = CommandEncoder::new();
    let audio = encoder.encode('3').expect("Failed to encode");

    // One second of silence on each side (44100 samples).
    let mut samples = vec![0i16; SAMPLE_RATE as usize];
    samples.extend_from_slice(&audio.samples);
    samples.extend_from_slice(&vec![0i16; SAMPLE_RATE as usize]);
    let recording = AudioFrame::new(samples, SAMPLE_RATE);

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&recording).expect("Failed to decode");

    assert_eq!(report.commands, vec!['3'], "Silence padding must not break decoding");
    assert_eq!(report.framing_errors, 0);
}

#[test]
fn test_press_timestamps_advance_with_the_stream() {
    let encoder = CommandEncoder::new();
    let audio = encoder.encode('7').expect("Failed to encode");

    let mut decoder = CommandDecoder::new(DecoderConfig::default())
        .expect("Failed to create decoder");
    let report = decoder.decode(&audio).expect("Failed to decode");

    assert_eq!(report.presses.len(), 5);
    for pair in report.presses.windows(2) {
        assert!(
            pair[1].start > pair[0].start,
            "Press starts must be strictly ordered: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }
    // Each tone lasts 0.4 s, about 8 analysis frames.
    for press in &report.presses {
        assert!(
            press.frames >= 7,
            "A full tone should span several analysis frames, got {}",
            press.frames
        );
    }
}
