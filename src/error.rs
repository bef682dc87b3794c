use thiserror::Error;

use crate::cursor::CursorError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("\"{field}\" must be between 1 and 255, got {value}")]
    InvalidLength { field: &'static str, value: usize },

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("envelope truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("envelope has {0} unexpected trailing bytes")]
    TrailingData(usize),

    #[error(transparent)]
    OutOfBounds(#[from] CursorError),

    /// Tag, padding or key-unwrap integrity check rejected the input.
    #[error("authentication failed: wrong key, wrong associated data or corrupted data")]
    AuthenticationFailed,

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    /// The cipher cannot accept data in its current configuration.
    #[error("cipher '{algorithm}' cannot process data in this state: {reason}")]
    UnsupportedState {
        algorithm: &'static str,
        reason: String,
    },

    /// The algorithm metadata cannot drive a cipher at all.
    #[error("cipher '{algorithm}' is misconfigured: {reason}")]
    Misconfigured {
        algorithm: &'static str,
        reason: String,
    },

    #[error("invalid key length for '{algorithm}': expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        algorithm: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("OS random generator unavailable")]
    Random,
}
