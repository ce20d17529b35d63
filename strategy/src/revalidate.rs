//! Revalidator (spec §4.3): recomputes net profit from fresh top-of-book
//! data and gates execution on a configured threshold.

use crate::errors::ExecutionError;
use common::{ErrorKind, ExecutionConfig, FixedQuantity, OrderbookSnapshot, Side};

/// Outcome of a successful revalidation: the funding amount actually used
/// and the net profit percent computed against it.
#[derive(Debug, Clone, Copy)]
pub struct RevalidationOutcome {
    pub funding_used: FixedQuantity,
    pub net_profit_pct: f64,
}

pub struct Revalidator;

impl Revalidator {
    /// Computes the realized outcome of a hypothetical traversal using
    /// top-of-book, applies the total cycle fee, and gates on
    /// `config.revalidation_threshold_pct`. Floats are used here per the
    /// spec's explicit carve-out for gate computation tolerance.
    pub fn revalidate(
        steps_sides: [Side; 3],
        snapshots: &[OrderbookSnapshot; 3],
        initial_amount: FixedQuantity,
        config: &ExecutionConfig,
    ) -> Result<RevalidationOutcome, ExecutionError> {
        for snapshot in snapshots {
            if !snapshot.has_two_sided_book() {
                return Err(ExecutionError::new(ErrorKind::ThinBook, "orderbook missing a side"));
            }
        }

        let funding_used = if initial_amount.to_f64() < config.funding_cap.to_f64() {
            initial_amount
        } else {
            config.funding_cap
        };
        let funding = funding_used.to_f64();

        // Step 1: buy C1 with C0 funding at the ask.
        let ask1 = snapshots[0].best_ask().unwrap().price.to_f64();
        let amt_c1 = funding / ask1;
        check_depth(snapshots[0].best_ask().unwrap().size.to_f64(), amt_c1)?;

        // Step 2: direction depends on symbol orientation. If the probe had
        // to fall back to the reciprocal pair, the book's base/quote roles
        // are swapped relative to `steps_sides[1]`, so the effective side
        // flips too (spec §4.2, §4.3, testable property 7).
        let effective_side_2 =
            if snapshots[1].inverted { steps_sides[1].flipped() } else { steps_sides[1] };
        let amt_c2 = match effective_side_2 {
            Side::Sell => {
                let bid2 = snapshots[1].best_bid().unwrap().price.to_f64();
                check_depth(snapshots[1].best_bid().unwrap().size.to_f64(), amt_c1)?;
                amt_c1 * bid2
            }
            Side::Buy => {
                let ask2 = snapshots[1].best_ask().unwrap().price.to_f64();
                check_depth(snapshots[1].best_ask().unwrap().size.to_f64(), amt_c1 / ask2)?;
                amt_c1 / ask2
            }
        };

        // Step 3: symmetric sell that returns C0.
        let bid3 = snapshots[2].best_bid().unwrap().price.to_f64();
        check_depth(snapshots[2].best_bid().unwrap().size.to_f64(), amt_c2)?;
        let final_c0 = amt_c2 * bid3;

        let total_fee_pct = config.total_fee_pct();
        let net_profit_pct = ((final_c0 - funding) / funding) * 100.0 - total_fee_pct;

        if net_profit_pct < config.revalidation_threshold_pct {
            return Err(ExecutionError::new(
                ErrorKind::BelowThreshold,
                format!("net profit {net_profit_pct:.4}% below threshold {:.4}%", config.revalidation_threshold_pct),
            ));
        }

        Ok(RevalidationOutcome { funding_used, net_profit_pct })
    }
}

fn check_depth(available: f64, required: f64) -> Result<(), ExecutionError> {
    if available + 1e-12 < required {
        return Err(ExecutionError::new(
            ErrorKind::ThinBook,
            format!("top-of-book size {available} insufficient for required {required}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Exchange, FixedPrice, Symbol};

    fn snapshot(symbol: &str, bid: f64, ask: f64, size: f64) -> OrderbookSnapshot {
        let mut ob = OrderbookSnapshot::new(Exchange::new("kucoin"), Symbol::new(symbol), 0);
        ob.add_bid(FixedPrice::from_f64(bid, 8), FixedQuantity::from_f64(size, 8));
        ob.add_ask(FixedPrice::from_f64(ask, 8), FixedQuantity::from_f64(size, 8));
        ob
    }

    fn config(threshold: f64, discount_active: bool) -> ExecutionConfig {
        ExecutionConfig {
            funding_cap: FixedQuantity::from_f64(1_000.0, 8),
            revalidation_threshold_pct: threshold,
            per_leg_fee_pct: 0.08,
            fee_token: "KCS".into(),
            fee_discount: 0.2,
            fee_discount_active: discount_active,
            ..Default::default()
        }
    }

    #[test]
    fn s1_happy_path_passes_threshold() {
        let snapshots = [
            snapshot("KCSUSDT", 9.98, 10.0, 5.0),
            snapshot("KCSBTC", 0.00020, 0.00021, 5.0),
            snapshot("BTCUSDT", 50200.0, 50210.0, 1.0),
        ];
        let outcome = Revalidator::revalidate(
            [Side::Buy, Side::Sell, Side::Sell],
            &snapshots,
            FixedQuantity::from_f64(20.0, 8),
            &config(0.1, true),
        )
        .unwrap();
        assert!(outcome.net_profit_pct > 0.0);
    }

    #[test]
    fn s2_below_threshold_rejects() {
        let snapshots = [
            snapshot("KCSUSDT", 9.98, 10.0, 5.0),
            snapshot("KCSBTC", 0.00020, 0.00021, 5.0),
            snapshot("BTCUSDT", 50010.0, 50020.0, 1.0),
        ];
        let err = Revalidator::revalidate(
            [Side::Buy, Side::Sell, Side::Sell],
            &snapshots,
            FixedQuantity::from_f64(20.0, 8),
            &config(0.8, true),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BelowThreshold);
    }

    #[test]
    fn s3_thin_book_rejects() {
        let snapshots = [
            snapshot("KCSUSDT", 9.98, 10.0, 1.5),
            snapshot("KCSBTC", 0.00020, 0.00021, 5.0),
            snapshot("BTCUSDT", 50200.0, 50210.0, 1.0),
        ];
        let err = Revalidator::revalidate(
            [Side::Buy, Side::Sell, Side::Sell],
            &snapshots,
            FixedQuantity::from_f64(20.0, 8),
            &config(0.1, true),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ThinBook);
    }

    #[test]
    fn funding_cap_limits_funding_used() {
        let snapshots = [
            snapshot("KCSUSDT", 9.98, 10.0, 50.0),
            snapshot("KCSBTC", 0.00020, 0.00021, 50.0),
            snapshot("BTCUSDT", 50200.0, 50210.0, 10.0),
        ];
        let mut cfg = config(0.1, true);
        cfg.funding_cap = FixedQuantity::from_f64(10.0, 8);
        let outcome = Revalidator::revalidate(
            [Side::Buy, Side::Sell, Side::Sell],
            &snapshots,
            FixedQuantity::from_f64(20.0, 8),
            &cfg,
        )
        .unwrap();
        assert_eq!(outcome.funding_used.to_f64(), 10.0);
    }

    #[test]
    fn inverted_middle_leg_matches_non_inverted_within_tolerance() {
        let direct = [
            snapshot("KCSUSDT", 9.98, 10.0, 5.0),
            snapshot("KCSBTC", 0.00020, 0.00021, 5.0),
            snapshot("BTCUSDT", 50200.0, 50210.0, 1.0),
        ];
        let inverted_middle = snapshot("BTCKCS", 1.0 / 0.00021, 1.0 / 0.00020, 5.0 * 0.0002).invert();
        let inverted = [direct[0].clone(), inverted_middle, direct[2].clone()];

        let direct_outcome = Revalidator::revalidate(
            [Side::Buy, Side::Sell, Side::Sell],
            &direct,
            FixedQuantity::from_f64(20.0, 8),
            &config(0.1, true),
        )
        .unwrap();
        let inverted_outcome = Revalidator::revalidate(
            [Side::Buy, Side::Sell, Side::Sell],
            &inverted,
            FixedQuantity::from_f64(20.0, 8),
            &config(0.1, true),
        )
        .unwrap();
        assert!((direct_outcome.net_profit_pct - inverted_outcome.net_profit_pct).abs() < 1e-6);
    }
}
