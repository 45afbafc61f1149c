use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToneLinkError {
    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(char),

    #[error("Message does not begin with the start marker")]
    MissingStartMarker,

    #[error("Message does not end with the terminator")]
    MissingTerminator,

    #[error("Checksum mismatch in message")]
    ChecksumMismatch,

    #[error("Message too short to contain a command")]
    TruncatedMessage,

    #[error("Sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("FFT error: {0}")]
    FftError(String),

    #[error("Audio capture unavailable: {0}")]
    CaptureUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ToneLinkError>;
