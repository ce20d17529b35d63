//! Errors raised by `VenueAdapter` implementations (spec §4.1).

use common::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("orderbook has no liquidity on one or both sides")]
    NoLiquidity,

    #[error("venue rejected the order: {0}")]
    Rejected(String),

    #[error("insufficient balance to place the order")]
    InsufficientBalance,

    #[error("quantity or price violates venue precision rules: {0}")]
    Precision(String),

    #[error("venue call did not complete before the deadline ({duration_ms}ms)")]
    Timeout { duration_ms: u64 },

    #[error("clock drift against the venue exceeded tolerance: {drift_ms}ms")]
    ClockSkew { drift_ms: i64 },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("NATS error: {0}")]
    Nats(#[from] async_nats::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&AdapterError> for ErrorKind {
    fn from(err: &AdapterError) -> Self {
        match err {
            AdapterError::NoLiquidity => ErrorKind::ThinBook,
            AdapterError::Rejected(_) => ErrorKind::Rejected,
            AdapterError::InsufficientBalance => ErrorKind::InsufficientBalance,
            AdapterError::Precision(_) => ErrorKind::Precision,
            AdapterError::Timeout { .. } => ErrorKind::Timeout,
            AdapterError::ClockSkew { .. } => ErrorKind::ClockSkew,
            AdapterError::Connection(_)
            | AdapterError::Configuration(_)
            | AdapterError::Serialization(_)
            | AdapterError::Nats(_)
            | AdapterError::Io(_) => ErrorKind::Rejected,
        }
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
