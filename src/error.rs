// src/error.rs
// Error taxonomy for the IP blocker

use thiserror::Error;

/// Failure reported by a raw key-value backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct KvError(pub String);

/// Persistence failure while loading or saving the block list.
///
/// Fatal to the current request. The enforcement path decides what to do
/// with it through the configured fail mode; every other caller surfaces a 500.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key-value {op} failed for key {key}: {source}")]
    Backend {
        op: &'static str,
        key: String,
        #[source]
        source: KvError,
    },
    #[error("stored block list under {key} could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("block list could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Malformed admin input. Recovered locally: nothing is written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{0} contains control characters")]
    ControlCharacters(&'static str),
}

/// An environment variable carried a value that cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
