//! The wire-level error taxonomy (spec §7) shared by every component.
//!
//! Each crate defines its own `thiserror` error enum at its boundary
//! (`adapters::AdapterError`, `strategy`'s execution errors,
//! `orchestrator::OrchestratorError`) and converts into `ErrorKind` via
//! `From`/`Into` so a `TradeRecord` always carries a single, total
//! classification regardless of which component raised it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed or skipped cycle, surfaced in `TradeRecord::error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ErrorKind {
    // Input errors: no venue calls made.
    #[error("cycle does not form a closed triangle")]
    MalformedCycle,
    #[error("currency is not supported by this engine")]
    CurrencyNotSupported,

    // Pre-admission failures: aborted before leg 1.
    #[error("orderbook snapshots did not arrive within the probe deadline")]
    Stale,
    #[error("top-of-book depth is insufficient for the required leg size")]
    ThinBook,
    #[error("revalidated net profit is below the configured threshold")]
    BelowThreshold,
    #[error("manual confirmation was not received before the deadline")]
    Unconfirmed,
    #[error("controller is not idle; opportunity discarded")]
    Busy,
    #[error("cancellation signal observed before leg 1")]
    Cancelled,

    // Mid-cycle failures: at least one leg was submitted.
    #[error("venue rejected the order")]
    Rejected,
    #[error("insufficient balance to place the order")]
    InsufficientBalance,
    #[error("quantity or price violates venue precision rules")]
    Precision,
    #[error("venue call did not complete before the deadline")]
    Timeout,
    #[error("clock drift against the venue exceeded tolerance")]
    ClockSkew,
    #[error("leg filled zero quantity")]
    ZeroFill,

    // Post-cycle errors: cycle completed but recording failed.
    #[error("trade record could not be emitted to the sink")]
    RecordEmitFailed,
}

impl ErrorKind {
    /// Whether this error can occur before any venue call was made.
    pub fn is_pre_admission(&self) -> bool {
        matches!(
            self,
            ErrorKind::MalformedCycle
                | ErrorKind::CurrencyNotSupported
                | ErrorKind::Stale
                | ErrorKind::ThinBook
                | ErrorKind::BelowThreshold
                | ErrorKind::Unconfirmed
                | ErrorKind::Busy
                | ErrorKind::Cancelled
        )
    }
}

pub type ErrorResult<T> = Result<T, ErrorKind>;
