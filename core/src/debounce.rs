use std::time::Duration;

/// One debounced key press reconstructed from per-frame observations
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolPress {
    /// Majority symbol across the run
    pub symbol: char,
    /// Stream time of the first frame in the run
    pub start: Duration,
    /// Number of frames the tone was observed
    pub frames: usize,
}

/// Collapses per-frame symbol observations into discrete presses.
///
/// Analysis frames are much shorter than a tone, so a single press shows up
/// as a run of identical observations. The debouncer gathers consecutive
/// symbol observations into a run and releases it once enough quiet frames
/// follow. Runs shorter than `min_press_frames` are dropped as blips. A
/// frame that misreads mid-tone does not split the run; the emitted symbol
/// is the one observed most often, ties going to the symbol seen first.
#[derive(Debug)]
pub struct SymbolDebouncer {
    min_press_frames: usize,
    min_gap_frames: usize,
    run: Option<Run>,
    gap_frames: usize,
}

#[derive(Debug)]
struct Run {
    // Insertion order is the tie-break order.
    counts: Vec<(char, usize)>,
    start: Duration,
    frames: usize,
}

impl SymbolDebouncer {
    pub fn new(min_press_frames: usize, min_gap_frames: usize) -> Self {
        Self {
            min_press_frames,
            min_gap_frames,
            run: None,
            gap_frames: 0,
        }
    }

    /// Feed the observation for one analysis frame: `Some` when a symbol was
    /// detected, `None` for a quiet or unreadable frame. Returns a press
    /// once a run has been followed by enough quiet frames.
    pub fn push(&mut self, observation: Option<(char, Duration)>) -> Option<SymbolPress> {
        match observation {
            Some((symbol, timestamp)) => {
                self.gap_frames = 0;
                match self.run.as_mut() {
                    Some(run) => {
                        run.frames += 1;
                        match run.counts.iter_mut().find(|(seen, _)| *seen == symbol) {
                            Some((_, count)) => *count += 1,
                            None => run.counts.push((symbol, 1)),
                        }
                    }
                    None => {
                        self.run = Some(Run {
                            counts: vec![(symbol, 1)],
                            start: timestamp,
                            frames: 1,
                        });
                    }
                }
                None
            }
            None => {
                self.run.as_ref()?;
                self.gap_frames += 1;
                if self.gap_frames >= self.min_gap_frames {
                    self.release()
                } else {
                    None
                }
            }
        }
    }

    /// Release any run still open, e.g. at the end of a recording
    pub fn flush(&mut self) -> Option<SymbolPress> {
        self.release()
    }

    /// Drop all pending state
    pub fn reset(&mut self) {
        self.run = None;
        self.gap_frames = 0;
    }

    fn release(&mut self) -> Option<SymbolPress> {
        let run = self.run.take()?;
        self.gap_frames = 0;
        if run.frames < self.min_press_frames {
            return None;
        }

        let mut winner: Option<(char, usize)> = None;
        for &(symbol, count) in &run.counts {
            let replace = match winner {
                Some((_, best)) => count > best,
                None => true,
            };
            if replace {
                winner = Some((symbol, count));
            }
        }
        winner.map(|(symbol, _)| SymbolPress {
            symbol,
            start: run.start,
            frames: run.frames,
        })
    }
}

impl Default for SymbolDebouncer {
    fn default() -> Self {
        Self::new(crate::DEBOUNCE_MIN_PRESS_FRAMES, crate::DEBOUNCE_MIN_GAP_FRAMES)
    }
}
