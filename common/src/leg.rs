//! Outcome of one market order placed by a `VenueAdapter` (spec §3, §4.1).

use crate::precision::FixedQuantity;
use crate::types::{Side, Symbol};
use serde::{Deserialize, Serialize};

/// Realized outcome of a single leg's market order.
///
/// `filled_base` and `cost_quote` are both reported in the unscaled units
/// of their respective currency; the Leg Sequencer is responsible for
/// threading the correct one forward per the base/quote accounting
/// contract (spec §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegResult {
    pub symbol: Symbol,
    pub side: Side,
    pub filled_base: FixedQuantity,
    pub cost_quote: FixedQuantity,
    pub fee_paid: FixedQuantity,
    pub fee_currency: String,
    pub wallclock_ms: u64,
}

impl LegResult {
    pub fn new(
        symbol: Symbol,
        side: Side,
        filled_base: FixedQuantity,
        cost_quote: FixedQuantity,
        fee_paid: FixedQuantity,
        fee_currency: impl Into<String>,
        wallclock_ms: u64,
    ) -> Self {
        Self {
            symbol,
            side,
            filled_base,
            cost_quote,
            fee_paid,
            fee_currency: fee_currency.into(),
            wallclock_ms,
        }
    }

    /// A market order that filled nothing transacted neither side.
    pub fn is_zero_fill(&self) -> bool {
        self.filled_base.is_zero() && self.cost_quote.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::FixedQuantity;

    #[test]
    fn zero_fill_detection() {
        let leg = LegResult::new(
            Symbol::new("KCSUSDT"),
            Side::Buy,
            FixedQuantity::from_raw(0, 8),
            FixedQuantity::from_raw(0, 8),
            FixedQuantity::from_raw(0, 8),
            "USDT",
            1_000,
        );
        assert!(leg.is_zero_fill());
    }

    #[test]
    fn nonzero_fill_is_not_zero_fill() {
        let leg = LegResult::new(
            Symbol::new("KCSUSDT"),
            Side::Buy,
            FixedQuantity::from_f64(2.0, 8),
            FixedQuantity::from_f64(20.0, 8),
            FixedQuantity::from_f64(0.016, 8),
            "USDT",
            1_000,
        );
        assert!(!leg.is_zero_fill());
    }
}
