//! Leg Sequencer (spec §4.4): executes the three legs serially, carrying
//! realized output amounts forward with a strict per-side accounting
//! contract. This file implements the single most error-prone invariant
//! in the engine and is unit-tested per side.

use crate::errors::ExecutionError;
use adapters::{AdapterError, VenueAdapter};
use common::{AmountLedger, ErrorKind, FixedQuantity, LegResult, Opportunity, Side, Step};

/// Outcome of driving a cycle to completion or to its failure point.
pub enum SequencerOutcome {
    Success { ledger: AmountLedger, legs: Vec<LegResult> },
    Failed { ledger: AmountLedger, legs: Vec<LegResult>, failed_leg_index: u8, error: ExecutionError },
}

pub struct LegSequencer<'a> {
    venue: &'a dyn VenueAdapter,
}

impl<'a> LegSequencer<'a> {
    pub fn new(venue: &'a dyn VenueAdapter) -> Self {
        Self { venue }
    }

    /// Places leg 1. `CLOCK_SKEW` is the one error this engine ever retries
    /// within a cycle (spec §7): a single `sync_time` then one retry of leg
    /// 1 only. Any other error, or a second `CLOCK_SKEW`, is fatal.
    async fn place_leg1(&self, step: &Step, funding_used: FixedQuantity) -> Result<LegResult, AdapterError> {
        match self.venue.place_market_order(&step.symbol, step.side, funding_used).await {
            Err(AdapterError::ClockSkew { .. }) => {
                self.venue.sync_time().await?;
                self.venue.place_market_order(&step.symbol, step.side, funding_used).await
            }
            result => result,
        }
    }

    /// Runs legs 1→2→3, feeding each leg's realized output into the next
    /// leg's input. `funding_used` is the amount already capped by the
    /// Revalidator (`min(initial_amount, funding_cap)`); no leg is ever
    /// given more than that even if a prior leg overfilled.
    ///
    /// A leg's produced amount is checked for positivity *before* it is
    /// pushed onto the ledger: a failure reported at leg `n` must always
    /// leave exactly `n - 1` ledger slots populated (testable property 1).
    pub async fn run(&self, opportunity: &Opportunity, funding_used: FixedQuantity) -> SequencerOutcome {
        let mut ledger = AmountLedger::new();
        let mut legs = Vec::with_capacity(3);

        // Step 1 (buy C1 with C0): quantity is quote-denominated funding.
        let step1 = &opportunity.steps[0];
        let leg1 = match self.place_leg1(step1, funding_used).await {
            Ok(leg) => leg,
            Err(e) => {
                return SequencerOutcome::Failed {
                    ledger,
                    legs,
                    failed_leg_index: 1,
                    error: ExecutionError::from(&e),
                }
            }
        };
        let c1_produced = leg1.filled_base;
        legs.push(leg1);
        if !c1_produced.is_positive() {
            return SequencerOutcome::Failed {
                ledger,
                legs,
                failed_leg_index: 1,
                error: ExecutionError::new(ErrorKind::ZeroFill, "leg 1 produced no C1"),
            };
        }
        ledger.push(c1_produced);

        // Step 2: input is ledger[0] (C1). Quantity semantics flip with side:
        // sell passes base (ledger[0]) and the output is cost_quote (C2);
        // buy passes quote (ledger[0]) and the output is filled_base (C2).
        let step2 = &opportunity.steps[1];
        let leg2 = match self.venue.place_market_order(&step2.symbol, step2.side, c1_produced).await {
            Ok(leg) => leg,
            Err(e) => {
                return SequencerOutcome::Failed {
                    ledger,
                    legs,
                    failed_leg_index: 2,
                    error: ExecutionError::from(&e),
                }
            }
        };
        let c2_produced = match step2.side {
            Side::Sell => leg2.cost_quote,
            Side::Buy => leg2.filled_base,
        };
        legs.push(leg2);
        if !c2_produced.is_positive() {
            return SequencerOutcome::Failed {
                ledger,
                legs,
                failed_leg_index: 2,
                error: ExecutionError::new(ErrorKind::ZeroFill, "leg 2 produced no C2"),
            };
        }
        ledger.push(c2_produced);

        // Step 3 (sell C2 for C0): input is ledger[1] (C2), base semantics.
        let step3 = &opportunity.steps[2];
        let leg3 = match self.venue.place_market_order(&step3.symbol, step3.side, c2_produced).await {
            Ok(leg) => leg,
            Err(e) => {
                return SequencerOutcome::Failed {
                    ledger,
                    legs,
                    failed_leg_index: 3,
                    error: ExecutionError::from(&e),
                }
            }
        };
        let c0_produced = leg3.cost_quote;
        legs.push(leg3);
        if !c0_produced.is_positive() {
            return SequencerOutcome::Failed {
                ledger,
                legs,
                failed_leg_index: 3,
                error: ExecutionError::new(ErrorKind::ZeroFill, "leg 3 filled zero quantity"),
            };
        }
        ledger.push(c0_produced);

        SequencerOutcome::Success { ledger, legs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::SimulatedVenueAdapter;
    use common::{Cycle, Exchange, FixedPrice, FixedQuantity, OrderbookSnapshot, Step, Symbol};

    fn book(symbol: &str, bid: f64, ask: f64) -> OrderbookSnapshot {
        let mut ob = OrderbookSnapshot::new(Exchange::new("kucoin"), Symbol::new(symbol), 0);
        ob.add_bid(FixedPrice::from_f64(bid, 8), FixedQuantity::from_f64(50.0, 8));
        ob.add_ask(FixedPrice::from_f64(ask, 8), FixedQuantity::from_f64(50.0, 8));
        ob
    }

    fn opportunity() -> Opportunity {
        Opportunity {
            exchange: Exchange::new("kucoin"),
            cycle: Cycle::new("USDT", "KCS", "BTC"),
            steps: [
                Step::new(Symbol::new("KCSUSDT"), Side::Buy),
                Step::new(Symbol::new("KCSBTC"), Side::Sell),
                Step::new(Symbol::new("BTCUSDT"), Side::Sell),
            ],
            initial_amount: FixedQuantity::from_f64(20.0, 8),
            expected_profit_pct: 0.3,
            expected_fees: 0.0,
            expected_slippage: 0.0,
        }
    }

    fn venue_with_books() -> SimulatedVenueAdapter {
        let venue = SimulatedVenueAdapter::new("kucoin");
        venue.set_orderbook(book("KCSUSDT", 9.99, 10.0));
        venue.set_orderbook(book("KCSBTC", 0.00020, 0.00021));
        venue.set_orderbook(book("BTCUSDT", 50200.0, 50210.0));
        venue
    }

    #[tokio::test]
    async fn happy_path_produces_full_ledger() {
        let venue = venue_with_books();
        let sequencer = LegSequencer::new(&venue);
        let outcome = sequencer.run(&opportunity(), FixedQuantity::from_f64(20.0, 8)).await;
        match outcome {
            SequencerOutcome::Success { ledger, legs } => {
                assert!(ledger.is_complete());
                assert_eq!(legs.len(), 3);
            }
            SequencerOutcome::Failed { .. } => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn step2_buy_side_consumes_quote_and_produces_filled_base() {
        // step2 side=Buy: input ledger[0] is passed as quote, output is filled_base.
        let venue = SimulatedVenueAdapter::new("kucoin");
        venue.set_orderbook(book("KCSUSDT", 9.99, 10.0));
        venue.set_orderbook(book("BTCKCS", 4999.0, 5000.0));
        venue.set_orderbook(book("BTCUSDT", 50200.0, 50210.0));
        let mut opp = opportunity();
        opp.steps[1] = Step::new(Symbol::new("BTCKCS"), Side::Buy);

        let sequencer = LegSequencer::new(&venue);
        let outcome = sequencer.run(&opp, FixedQuantity::from_f64(20.0, 8)).await;
        match outcome {
            SequencerOutcome::Success { ledger, .. } => {
                // leg2 bought BTC (base) with KCS (quote): ledger[1] is filled_base (BTC).
                assert!(ledger.get(1).unwrap().is_positive());
            }
            SequencerOutcome::Failed { error, .. } => panic!("expected success, got {error}"),
        }
    }

    #[tokio::test]
    async fn mid_cycle_rejection_reports_correct_failed_leg_index() {
        let venue = venue_with_books();
        venue.reject_next(Symbol::new("KCSBTC"), 1, || adapters::AdapterError::Rejected("no".into()));
        let sequencer = LegSequencer::new(&venue);
        let outcome = sequencer.run(&opportunity(), FixedQuantity::from_f64(20.0, 8)).await;
        match outcome {
            SequencerOutcome::Failed { failed_leg_index, ledger, .. } => {
                assert_eq!(failed_leg_index, 2);
                assert_eq!(ledger.len(), 1);
            }
            SequencerOutcome::Success { .. } => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn funding_cap_is_never_exceeded() {
        let venue = venue_with_books();
        let sequencer = LegSequencer::new(&venue);
        let capped = FixedQuantity::from_f64(5.0, 8);
        let outcome = sequencer.run(&opportunity(), capped).await;
        if let SequencerOutcome::Success { legs, .. } = outcome {
            assert_eq!(legs[0].cost_quote.to_f64(), 5.0);
        } else {
            panic!("expected success");
        }
    }

    #[tokio::test]
    async fn clock_skew_on_leg_one_retries_once_then_succeeds() {
        let venue = venue_with_books();
        venue.reject_next(Symbol::new("KCSUSDT"), 1, || AdapterError::ClockSkew { drift_ms: 5_000 });
        let sequencer = LegSequencer::new(&venue);
        let outcome = sequencer.run(&opportunity(), FixedQuantity::from_f64(20.0, 8)).await;
        match outcome {
            SequencerOutcome::Success { legs, .. } => assert_eq!(legs.len(), 3),
            SequencerOutcome::Failed { error, .. } => panic!("expected success after clock-skew retry, got {error}"),
        }
    }

    #[tokio::test]
    async fn clock_skew_twice_on_leg_one_is_fatal() {
        let venue = venue_with_books();
        venue.reject_next(Symbol::new("KCSUSDT"), 2, || AdapterError::ClockSkew { drift_ms: 5_000 });
        let sequencer = LegSequencer::new(&venue);
        let outcome = sequencer.run(&opportunity(), FixedQuantity::from_f64(20.0, 8)).await;
        match outcome {
            SequencerOutcome::Failed { failed_leg_index, error, .. } => {
                assert_eq!(failed_leg_index, 1);
                assert_eq!(error.kind, ErrorKind::ClockSkew);
            }
            SequencerOutcome::Success { .. } => panic!("expected failure on repeated clock skew"),
        }
    }

    /// A leg that consumes base but produces zero quote (full-fee rounding)
    /// must fail *before* the zero amount reaches the ledger, so a leg-2
    /// failure always leaves exactly one ledger slot populated.
    struct ZeroQuoteLeg2Venue {
        inner: SimulatedVenueAdapter,
    }

    #[async_trait::async_trait]
    impl VenueAdapter for ZeroQuoteLeg2Venue {
        async fn get_orderbook(&self, symbol: &Symbol, depth: u32) -> adapters::AdapterResult<OrderbookSnapshot> {
            self.inner.get_orderbook(symbol, depth).await
        }

        async fn place_market_order(&self, symbol: &Symbol, side: Side, quantity: FixedQuantity) -> adapters::AdapterResult<LegResult> {
            if symbol.as_str() == "KCSBTC" {
                let zero = FixedQuantity::from_raw(0, quantity.scale());
                return Ok(LegResult::new(symbol.clone(), side, quantity, zero, zero, "BTC", 0));
            }
            self.inner.place_market_order(symbol, side, quantity).await
        }

        async fn sync_time(&self) -> adapters::AdapterResult<i64> {
            self.inner.sync_time().await
        }

        async fn symbol_info(&self, symbol: &Symbol) -> adapters::AdapterResult<adapters::SymbolInfo> {
            self.inner.symbol_info(symbol).await
        }

        async fn fee_schedule(&self, symbol: &Symbol) -> adapters::AdapterResult<adapters::FeeSchedule> {
            self.inner.fee_schedule(symbol).await
        }

        fn time_skew_ms(&self) -> i64 {
            self.inner.time_skew_ms()
        }

        fn name(&self) -> &'static str {
            "zero-quote-leg2"
        }
    }

    #[tokio::test]
    async fn leg2_zero_quote_produced_fails_before_ledger_push() {
        let venue = ZeroQuoteLeg2Venue { inner: venue_with_books() };
        let sequencer = LegSequencer::new(&venue);
        let outcome = sequencer.run(&opportunity(), FixedQuantity::from_f64(20.0, 8)).await;
        match outcome {
            SequencerOutcome::Failed { failed_leg_index, ledger, .. } => {
                assert_eq!(failed_leg_index, 2);
                assert_eq!(ledger.len(), 1);
            }
            SequencerOutcome::Success { .. } => panic!("expected failure"),
        }
    }
}
