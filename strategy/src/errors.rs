//! Execution-time errors raised by the Probe, Revalidator and Sequencer.
//!
//! Every variant carries the wire-level [`ErrorKind`] it classifies as,
//! plus a human-readable detail for logs; the controller discards the
//! detail and keeps only the `ErrorKind` when writing a `TradeRecord`.

use adapters::AdapterError;
use common::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{kind:?}: {detail}")]
pub struct ExecutionError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ExecutionError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }
}

impl From<&AdapterError> for ExecutionError {
    fn from(err: &AdapterError) -> Self {
        Self::new(ErrorKind::from(err), err.to_string())
    }
}

impl From<AdapterError> for ExecutionError {
    fn from(err: AdapterError) -> Self {
        Self::from(&err)
    }
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;
