use serde::{Deserialize, Serialize};

/// Exchange identifier (e.g. "binance", "kucoin")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exchange(String);

impl Exchange {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trading symbol (e.g., "KCSUSDT")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A currency code within a cycle (e.g. "USDT", "KCS", "BTC").
pub type Currency = String;

/// Order side, determined by symbol orientation at the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The opposite side, as seen from the reciprocal symbol. Used by the
    /// Revalidator when a leg's orderbook was fetched inverted.
    pub fn flipped(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Outcome of a call to the opportunity intake function (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionResult {
    ExecutedOk,
    ExecutedFail,
    RejectedBusy,
    RejectedStale,
    RejectedThreshold,
    RejectedThinBook,
    RejectedMalformed,
    RejectedUnconfirmed,
    RejectedCancelled,
}

impl AdmissionResult {
    pub fn is_rejected(&self) -> bool {
        !matches!(self, AdmissionResult::ExecutedOk | AdmissionResult::ExecutedFail)
    }
}

impl std::fmt::Display for AdmissionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AdmissionResult::ExecutedOk => "EXECUTED_OK",
            AdmissionResult::ExecutedFail => "EXECUTED_FAIL",
            AdmissionResult::RejectedBusy => "REJECTED_BUSY",
            AdmissionResult::RejectedStale => "REJECTED_STALE",
            AdmissionResult::RejectedThreshold => "REJECTED_THRESHOLD",
            AdmissionResult::RejectedThinBook => "REJECTED_THIN_BOOK",
            AdmissionResult::RejectedMalformed => "REJECTED_MALFORMED",
            AdmissionResult::RejectedUnconfirmed => "REJECTED_UNCONFIRMED",
            AdmissionResult::RejectedCancelled => "REJECTED_CANCELLED",
        };
        write!(f, "{s}")
    }
}
