use crate::error::{Result, ToneLinkError};
use crate::symbols::frequency_pair_of;

/// Marks the beginning of a message on the wire
pub const START_SYMBOL: char = '#';

/// Marks the end of a message on the wire
pub const END_SYMBOL: char = '*';

/// Longest legal message: START + command + three checksum digits + END.
/// An ASCII ordinal is at most three digits.
pub const MAX_MESSAGE_SYMBOLS: usize = 6;

/// Builds and validates command messages.
///
/// Wire layout: `START, command, checksum digits, END`, where the digits are
/// the decimal expansion of the command's ASCII ordinal: `build('F')` yields
/// `# F 7 0 *`. There is no delimiter between the variable-length digits and
/// END; the parser relies on END being last and the digits matching the
/// received command.
pub struct MessageFramer;

impl MessageFramer {
    /// Frame a single command symbol
    pub fn build(command: char) -> Result<Vec<char>> {
        // A command outside the symbol table could never be synthesized.
        frequency_pair_of(command)?;
        let mut message = vec![START_SYMBOL, command];
        message.extend((command as u32).to_string().chars());
        message.push(END_SYMBOL);
        Ok(message)
    }

    /// Validate one complete message and return its command
    pub fn parse(symbols: &[char]) -> Result<char> {
        if symbols.len() < 3 {
            return Err(ToneLinkError::TruncatedMessage);
        }
        if symbols[0] != START_SYMBOL {
            return Err(ToneLinkError::MissingStartMarker);
        }
        if symbols[symbols.len() - 1] != END_SYMBOL {
            return Err(ToneLinkError::MissingTerminator);
        }

        let command = symbols[1];
        let digits: String = symbols[2..symbols.len() - 1].iter().collect();
        if digits != (command as u32).to_string() {
            return Err(ToneLinkError::ChecksumMismatch);
        }
        Ok(command)
    }
}

/// Re-frames a live symbol stream into messages.
///
/// Symbols arriving before a START are ignored as line noise. A START while
/// already collecting restarts the collection, since the message in progress
/// can no longer terminate cleanly. Every END closes the collection with a
/// parse attempt; a parse failure is returned for observability and scanning
/// resumes at the next START. The buffer is bounded so a lost END cannot
/// grow a collection forever.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    buffer: Option<Vec<char>>,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self { buffer: None }
    }

    /// Feed one decoded symbol; returns `Some` whenever a message completed
    /// or the collection had to be abandoned
    pub fn push(&mut self, symbol: char) -> Option<Result<char>> {
        match symbol {
            START_SYMBOL => {
                self.buffer = Some(vec![START_SYMBOL]);
                None
            }
            END_SYMBOL => {
                let mut message = self.buffer.take()?;
                message.push(END_SYMBOL);
                Some(MessageFramer::parse(&message))
            }
            other => {
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.push(other);
                    if buffer.len() >= MAX_MESSAGE_SYMBOLS {
                        self.buffer = None;
                        return Some(Err(ToneLinkError::MissingTerminator));
                    }
                }
                None
            }
        }
    }

    /// True while a message is partially collected
    pub fn is_collecting(&self) -> bool {
        self.buffer.is_some()
    }

    /// Drop any partial collection
    pub fn reset(&mut self) {
        self.buffer = None;
    }
}
