//! Candidate cycles handed to the engine by the (external) Detector (spec §3).

use crate::errors::ErrorKind;
use crate::precision::FixedQuantity;
use crate::types::{Currency, Exchange, Side, Symbol};
use serde::{Deserialize, Serialize};

/// The ordered triple of currencies C0 → C1 → C2 → C0 traversed by a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub c0: Currency,
    pub c1: Currency,
    pub c2: Currency,
}

impl Cycle {
    pub fn new(c0: impl Into<Currency>, c1: impl Into<Currency>, c2: impl Into<Currency>) -> Self {
        Self { c0: c0.into(), c1: c1.into(), c2: c2.into() }
    }

    /// Currency produced by leg `i` (0-indexed), i.e. `C_{(i+1) mod 3}`.
    pub fn produced_by(&self, leg_index: usize) -> &Currency {
        match leg_index % 3 {
            0 => &self.c1,
            1 => &self.c2,
            _ => &self.c0,
        }
    }

    /// A closed cycle requires three pairwise-distinct, non-empty currencies.
    pub fn is_closed(&self) -> bool {
        !self.c0.is_empty()
            && !self.c1.is_empty()
            && !self.c2.is_empty()
            && self.c0 != self.c1
            && self.c1 != self.c2
            && self.c0 != self.c2
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}->{}->{}", self.c0, self.c1, self.c2, self.c0)
    }
}

/// One step of a cycle: the symbol to trade and the side determined by
/// that symbol's orientation at the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub symbol: Symbol,
    pub side: Side,
}

impl Step {
    pub fn new(symbol: Symbol, side: Side) -> Self {
        Self { symbol, side }
    }
}

/// A candidate cycle as proposed by the Detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub exchange: Exchange,
    pub cycle: Cycle,
    pub steps: [Step; 3],
    pub initial_amount: FixedQuantity,
    /// Reporting-only fields from the Detector; never used in gating.
    pub expected_profit_pct: f64,
    pub expected_fees: f64,
    pub expected_slippage: f64,
}

impl Opportunity {
    /// Structural validation required before admission past ADMITTING
    /// (spec §3 invariant, §4.6 ADMITTING state).
    pub fn validate_shape(&self) -> Result<(), ErrorKind> {
        if !self.cycle.is_closed() {
            return Err(ErrorKind::MalformedCycle);
        }
        if self.initial_amount.is_zero() || !self.initial_amount.is_positive() {
            return Err(ErrorKind::MalformedCycle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opp(c0: &str, c1: &str, c2: &str, amount: f64) -> Opportunity {
        Opportunity {
            exchange: Exchange::new("kucoin"),
            cycle: Cycle::new(c0, c1, c2),
            steps: [
                Step::new(Symbol::new("KCSUSDT"), Side::Buy),
                Step::new(Symbol::new("KCSBTC"), Side::Sell),
                Step::new(Symbol::new("BTCUSDT"), Side::Sell),
            ],
            initial_amount: FixedQuantity::from_f64(amount, 8),
            expected_profit_pct: 0.3,
            expected_fees: 0.0024,
            expected_slippage: 0.0,
        }
    }

    #[test]
    fn closed_cycle_validates() {
        assert!(opp("USDT", "KCS", "BTC", 20.0).validate_shape().is_ok());
    }

    #[test]
    fn repeated_currency_is_malformed() {
        let result = opp("USDT", "USDT", "BTC", 20.0).validate_shape();
        assert_eq!(result.unwrap_err(), ErrorKind::MalformedCycle);
    }

    #[test]
    fn zero_funding_is_malformed() {
        let result = opp("USDT", "KCS", "BTC", 0.0).validate_shape();
        assert_eq!(result.unwrap_err(), ErrorKind::MalformedCycle);
    }

    #[test]
    fn produced_by_wraps_mod_three() {
        let cycle = Cycle::new("USDT", "KCS", "BTC");
        assert_eq!(cycle.produced_by(0), "KCS");
        assert_eq!(cycle.produced_by(1), "BTC");
        assert_eq!(cycle.produced_by(2), "USDT");
    }
}
