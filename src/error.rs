use thiserror::Error;

/// Errors raised by the harness-side surfaces of the crate.
///
/// The transform itself (`reduce`, `ntt`, `poly`, `polyvec`) is total and never
/// produces one of these; only decoding, configuration and timing assessment
/// are fallible.
#[derive(Error, Debug)]
pub enum NttError {
    #[error("Invalid dimension: expected {expected}, got {got}")]
    InvalidDimension {
        expected: usize,
        got: usize,
    },

    #[error("Invalid module rank {0}: expected 2, 3 or 4")]
    InvalidRank(usize),

    #[error("Malformed input at line {line}: {reason}")]
    MalformedInput {
        line: usize,
        reason: String,
    },

    #[error("Truncated input: expected {expected} bytes, got {got}")]
    TruncatedInput {
        expected: usize,
        got: usize,
    },

    #[error("Unexpected trailing input: {0} extra bytes")]
    TrailingInput(usize),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NttError>;
