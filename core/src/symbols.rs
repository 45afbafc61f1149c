use crate::error::{Result, ToneLinkError};

/// Low tone band in Hz; every symbol uses exactly one entry from each band
pub const LOW_BAND_HZ: [u16; 4] = [697, 770, 852, 941];

/// High tone band in Hz
pub const HIGH_BAND_HZ: [u16; 3] = [1209, 1336, 1477];

/// One DTMF tone pair: a low-band and a high-band frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPair {
    pub low: u16,
    pub high: u16,
}

impl FrequencyPair {
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// True when `a` and `b` are each within `tolerance_hz` of this pair's
    /// tones, in either order. The bound is inclusive.
    pub fn matches(&self, a: f32, b: f32, tolerance_hz: f32) -> bool {
        let low = self.low as f32;
        let high = self.high as f32;
        let near = |freq: f32, tone: f32| (freq - tone).abs() <= tolerance_hz;
        (near(a, low) && near(b, high)) || (near(a, high) && near(b, low))
    }
}

/// Symbol table shared by the synthesizer and the detector.
///
/// An ordered array rather than a map: lookups scan in insertion order and the
/// first matching entry wins. The twelve keypad entries come first, then four
/// directional command aliases (forward/back/left/right) that reuse keypad
/// pairs. An aliased pair therefore always resolves to its keypad symbol:
/// (697, 1209) is '1', never 'F'.
pub const SYMBOL_TABLE: [(char, FrequencyPair); 16] = [
    ('1', FrequencyPair::new(697, 1209)),
    ('2', FrequencyPair::new(697, 1336)),
    ('3', FrequencyPair::new(697, 1477)),
    ('4', FrequencyPair::new(770, 1209)),
    ('5', FrequencyPair::new(770, 1336)),
    ('6', FrequencyPair::new(770, 1477)),
    ('7', FrequencyPair::new(852, 1209)),
    ('8', FrequencyPair::new(852, 1336)),
    ('9', FrequencyPair::new(852, 1477)),
    ('*', FrequencyPair::new(941, 1209)),
    ('0', FrequencyPair::new(941, 1336)),
    ('#', FrequencyPair::new(941, 1477)),
    ('F', FrequencyPair::new(697, 1209)),
    ('B', FrequencyPair::new(770, 1336)),
    ('L', FrequencyPair::new(852, 1477)),
    ('R', FrequencyPair::new(941, 1336)),
];

/// Look up the tone pair that encodes a symbol
pub fn frequency_pair_of(symbol: char) -> Result<FrequencyPair> {
    SYMBOL_TABLE
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, pair)| *pair)
        .ok_or(ToneLinkError::UnknownSymbol(symbol))
}

/// Match a detected frequency pair back to a symbol.
///
/// Query order does not matter: (high, low) matches the same entry as
/// (low, high). Returns the first table entry whose tones are each within
/// `tolerance_hz` of the query, or `None` when nothing qualifies.
pub fn symbol_of(freq_a: f32, freq_b: f32, tolerance_hz: f32) -> Option<char> {
    SYMBOL_TABLE
        .iter()
        .find(|(_, pair)| pair.matches(freq_a, freq_b, tolerance_hz))
        .map(|(symbol, _)| *symbol)
}
