use std::time::Duration;

/// Loudness gate in front of spectral analysis.
///
/// RMS is measured on the 16-bit sample scale; the default floor of 1000
/// passes tone playback at normal levels and rejects room noise.
pub struct SignalGate {
    noise_floor: f32,
}

impl SignalGate {
    pub fn new(noise_floor: f32) -> Self {
        Self { noise_floor }
    }

    /// Root-mean-square level of a window; an empty window scores 0.0
    pub fn rms(samples: &[i16]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples
            .iter()
            .map(|&s| {
                let v = s as f64;
                v * v
            })
            .sum();
        (sum_sq / samples.len() as f64).sqrt() as f32
    }

    /// True when the window meets or exceeds the noise floor
    pub fn should_analyze(&self, samples: &[i16]) -> bool {
        Self::rms(samples) >= self.noise_floor
    }

    pub fn noise_floor(&self) -> f32 {
        self.noise_floor
    }
}

impl Default for SignalGate {
    fn default() -> Self {
        Self::new(crate::NOISE_FLOOR_RMS)
    }
}

/// Rate limiter for the diagnostics channel.
///
/// One instance is shared by every diagnostic kind, so together they emit at
/// most once per interval; the first poll always fires. Time is whatever
/// monotonic clock the caller supplies. The stream decoder feeds stream
/// positions, which makes throttling deterministic under replay.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when at least `interval` has passed since the last firing;
    /// records `now` when it fires
    pub fn poll(&mut self, now: Duration) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Forget the last firing so the next poll fires immediately
    pub fn reset(&mut self) {
        self.last = None;
    }
}
