//! Freshness Probe (spec §4.2): parallel fetch of the three orderbooks
//! constituting a candidate cycle, bounded by one aggregate deadline.

use crate::errors::{ExecutionError, ExecutionResult};
use adapters::VenueAdapter;
use common::{ErrorKind, Opportunity, OrderbookSnapshot, Step, Symbol};
use std::time::Duration;

pub struct FreshnessProbe<'a> {
    venue: &'a dyn VenueAdapter,
}

impl<'a> FreshnessProbe<'a> {
    pub fn new(venue: &'a dyn VenueAdapter) -> Self {
        Self { venue }
    }

    /// Fetches all three cycle symbols in parallel. The middle leg (step
    /// index 1, C1→C2) is retried once with its symbol inverted if the
    /// direct fetch fails; a successful inverted fetch is marked so the
    /// Revalidator flips its bid/ask interpretation. The whole probe,
    /// including any retry, must complete within `deadline_ms`.
    pub async fn probe(
        &self,
        opportunity: &Opportunity,
        depth: u32,
        deadline_ms: u64,
    ) -> ExecutionResult<[OrderbookSnapshot; 3]> {
        let fut = self.fetch_all(opportunity, depth);
        match tokio::time::timeout(Duration::from_millis(deadline_ms), fut).await {
            Ok(result) => result,
            Err(_) => Err(ExecutionError::new(ErrorKind::Stale, "probe deadline exceeded")),
        }
    }

    async fn fetch_all(&self, opportunity: &Opportunity, depth: u32) -> ExecutionResult<[OrderbookSnapshot; 3]> {
        let (first, middle, last) = tokio::join!(
            self.fetch_step(&opportunity.steps[0], depth),
            self.fetch_middle(&opportunity.steps[1], &opportunity.cycle.c1, &opportunity.cycle.c2, depth),
            self.fetch_step(&opportunity.steps[2], depth),
        );
        Ok([first?, middle?, last?])
    }

    async fn fetch_step(&self, step: &Step, depth: u32) -> ExecutionResult<OrderbookSnapshot> {
        self.venue
            .get_orderbook(&step.symbol, depth)
            .await
            .map_err(|e| ExecutionError::from(&e))
    }

    async fn fetch_middle(
        &self,
        step: &Step,
        c1: &str,
        c2: &str,
        depth: u32,
    ) -> ExecutionResult<OrderbookSnapshot> {
        match self.venue.get_orderbook(&step.symbol, depth).await {
            Ok(snapshot) => Ok(snapshot),
            Err(_) => {
                let inverted_symbol = Symbol::new(format!("{c2}{c1}"));
                self.venue
                    .get_orderbook(&inverted_symbol, depth)
                    .await
                    .map(OrderbookSnapshot::invert)
                    .map_err(|e| ExecutionError::from(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::SimulatedVenueAdapter;
    use common::{Exchange, FixedPrice, FixedQuantity, Opportunity, Side};

    fn opportunity() -> Opportunity {
        Opportunity {
            exchange: Exchange::new("kucoin"),
            cycle: common::Cycle::new("USDT", "KCS", "BTC"),
            steps: [
                common::Step::new(Symbol::new("KCSUSDT"), Side::Buy),
                common::Step::new(Symbol::new("KCSBTC"), Side::Sell),
                common::Step::new(Symbol::new("BTCUSDT"), Side::Sell),
            ],
            initial_amount: FixedQuantity::from_f64(20.0, 8),
            expected_profit_pct: 0.3,
            expected_fees: 0.0024,
            expected_slippage: 0.0,
        }
    }

    fn set_book(venue: &SimulatedVenueAdapter, symbol: &str, bid: f64, ask: f64) {
        let mut book = OrderbookSnapshot::new(Exchange::new("kucoin"), Symbol::new(symbol), 0);
        book.add_bid(FixedPrice::from_f64(bid, 8), FixedQuantity::from_f64(10.0, 8));
        book.add_ask(FixedPrice::from_f64(ask, 8), FixedQuantity::from_f64(10.0, 8));
        venue.set_orderbook(book);
    }

    #[tokio::test]
    async fn fetches_all_three_legs_in_parallel() {
        let venue = SimulatedVenueAdapter::new("kucoin");
        set_book(&venue, "KCSUSDT", 9.99, 10.0);
        set_book(&venue, "KCSBTC", 0.000195, 0.00020);
        set_book(&venue, "BTCUSDT", 50200.0, 50210.0);

        let probe = FreshnessProbe::new(&venue);
        let snapshots = probe.probe(&opportunity(), 5, 200).await.unwrap();
        assert_eq!(snapshots[0].symbol.as_str(), "KCSUSDT");
        assert!(!snapshots[1].inverted);
    }

    #[tokio::test]
    async fn middle_leg_retries_inverted_on_failure() {
        let venue = SimulatedVenueAdapter::new("kucoin");
        set_book(&venue, "KCSUSDT", 9.99, 10.0);
        set_book(&venue, "BTCKCS", 4999.0, 5000.0); // inverse of KCS/BTC
        set_book(&venue, "BTCUSDT", 50200.0, 50210.0);

        let probe = FreshnessProbe::new(&venue);
        let snapshots = probe.probe(&opportunity(), 5, 200).await.unwrap();
        assert!(snapshots[1].inverted);
        assert_eq!(snapshots[1].symbol.as_str(), "BTCKCS");
    }

    #[tokio::test]
    async fn missing_leg_fails_the_whole_probe() {
        let venue = SimulatedVenueAdapter::new("kucoin");
        set_book(&venue, "KCSUSDT", 9.99, 10.0);
        set_book(&venue, "KCSBTC", 0.000195, 0.00020);
        // BTCUSDT deliberately missing

        let probe = FreshnessProbe::new(&venue);
        let result = probe.probe(&opportunity(), 5, 200).await;
        assert!(result.is_err());
    }
}
