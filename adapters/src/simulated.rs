//! A reference `VenueAdapter` used by the orchestrator's integration tests
//! (spec §8 scenarios S1-S6). Orderbooks are injected by the test harness;
//! order placement fills deterministically against whatever top-of-book
//! was last set for the symbol.

use crate::error::{AdapterError, AdapterResult};
use crate::venue::{FeeSchedule, SymbolInfo, VenueAdapter};
use common::{Exchange, FixedPrice, FixedQuantity, LegResult, OrderbookSnapshot, Side, Symbol};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct RejectRule {
    remaining: u32,
    error: fn() -> AdapterError,
}

/// A programmable in-memory venue. Tests configure its books and fee
/// schedule, then drive `get_orderbook`/`place_market_order` exactly as the
/// controller would against a real exchange.
pub struct SimulatedVenueAdapter {
    exchange: Exchange,
    books: Arc<RwLock<HashMap<Symbol, OrderbookSnapshot>>>,
    fees: Arc<RwLock<HashMap<Symbol, FeeSchedule>>>,
    rejects: Arc<RwLock<HashMap<Symbol, RejectRule>>>,
    time_skew_ms: AtomicI64,
    clock_ms: AtomicI64,
}

impl SimulatedVenueAdapter {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: Exchange::new(exchange),
            books: Arc::new(RwLock::new(HashMap::new())),
            fees: Arc::new(RwLock::new(HashMap::new())),
            rejects: Arc::new(RwLock::new(HashMap::new())),
            time_skew_ms: AtomicI64::new(0),
            clock_ms: AtomicI64::new(0),
        }
    }

    pub fn set_orderbook(&self, snapshot: OrderbookSnapshot) {
        self.books.write().insert(snapshot.symbol.clone(), snapshot);
    }

    pub fn set_fee_schedule(&self, symbol: Symbol, schedule: FeeSchedule) {
        self.fees.write().insert(symbol, schedule);
    }

    /// Causes the next `count` calls to `place_market_order` for `symbol`
    /// to fail with `error`, then resume filling normally.
    pub fn reject_next(&self, symbol: Symbol, count: u32, error: fn() -> AdapterError) {
        self.rejects.write().insert(symbol, RejectRule { remaining: count, error });
    }

    pub fn set_time_skew(&self, drift_ms: i64) {
        self.time_skew_ms.store(drift_ms, Ordering::Release);
    }

    pub fn advance_clock_ms(&self, delta: i64) {
        self.clock_ms.fetch_add(delta, Ordering::AcqRel);
    }

    fn now_ms(&self) -> i64 {
        self.clock_ms.load(Ordering::Acquire)
    }
}

#[async_trait::async_trait]
impl VenueAdapter for SimulatedVenueAdapter {
    async fn get_orderbook(&self, symbol: &Symbol, _depth: u32) -> AdapterResult<OrderbookSnapshot> {
        self.books
            .read()
            .get(symbol)
            .cloned()
            .ok_or(AdapterError::NoLiquidity)
    }

    async fn place_market_order(
        &self,
        symbol: &Symbol,
        side: Side,
        quantity: FixedQuantity,
    ) -> AdapterResult<LegResult> {
        if let Some(rule) = self.rejects.write().get_mut(symbol) {
            if rule.remaining > 0 {
                rule.remaining -= 1;
                return Err((rule.error)());
            }
        }

        let book = self.books.read().get(symbol).cloned().ok_or(AdapterError::NoLiquidity)?;
        let fee_pct = self
            .fees
            .read()
            .get(symbol)
            .map(|f| effective_fee_pct(f))
            .unwrap_or(0.0);
        let wallclock_ms = self.now_ms() as u64;

        match side {
            Side::Buy => {
                let ask = book.best_ask().ok_or(AdapterError::NoLiquidity)?;
                let gross_base = quantity / ask.price;
                let fee_paid = FixedQuantity::from_f64(gross_base.to_f64() * fee_pct / 100.0, gross_base.scale());
                let filled_base = gross_base - fee_paid;
                Ok(LegResult::new(
                    symbol.clone(),
                    side,
                    filled_base,
                    quantity,
                    fee_paid,
                    base_currency_of(symbol),
                    wallclock_ms,
                ))
            }
            Side::Sell => {
                let bid = book.best_bid().ok_or(AdapterError::NoLiquidity)?;
                let gross_quote = quantity * bid.price;
                let gross_quote_qty = FixedQuantity::from_f64(gross_quote.to_f64(), quantity.scale());
                let fee_paid =
                    FixedQuantity::from_f64(gross_quote_qty.to_f64() * fee_pct / 100.0, quantity.scale());
                let cost_quote = gross_quote_qty - fee_paid;
                Ok(LegResult::new(
                    symbol.clone(),
                    side,
                    quantity,
                    cost_quote,
                    fee_paid,
                    quote_currency_of(symbol),
                    wallclock_ms,
                ))
            }
        }
    }

    async fn sync_time(&self) -> AdapterResult<i64> {
        Ok(self.time_skew_ms.load(Ordering::Acquire))
    }

    async fn symbol_info(&self, _symbol: &Symbol) -> AdapterResult<SymbolInfo> {
        Ok(SymbolInfo {
            tick_size: FixedPrice::from_f64(0.00000001, 8),
            lot_step: FixedQuantity::from_f64(0.00000001, 8),
            min_notional: FixedPrice::from_f64(1.0, 8),
        })
    }

    async fn fee_schedule(&self, symbol: &Symbol) -> AdapterResult<FeeSchedule> {
        self.fees
            .read()
            .get(symbol)
            .cloned()
            .ok_or(AdapterError::Configuration(format!("no fee schedule set for {symbol}")))
    }

    fn time_skew_ms(&self) -> i64 {
        self.time_skew_ms.load(Ordering::Acquire)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

fn effective_fee_pct(schedule: &FeeSchedule) -> f64 {
    if schedule.discount_token_held {
        schedule.taker_fee_pct * (1.0 - schedule.discount_pct)
    } else {
        schedule.taker_fee_pct
    }
}

/// Best-effort split of a concatenated symbol like "KCSUSDT" into base/quote
/// halves, used only to label fee currency on simulated fills. Real venue
/// adapters know their own pair separator; this heuristic is test-only.
fn base_currency_of(symbol: &Symbol) -> String {
    split_symbol(symbol.as_str()).0
}

fn quote_currency_of(symbol: &Symbol) -> String {
    split_symbol(symbol.as_str()).1
}

fn split_symbol(symbol: &str) -> (String, String) {
    const QUOTES: &[&str] = &["USDT", "USDC", "BTC", "ETH", "KCS"];
    for quote in QUOTES {
        if symbol.ends_with(quote) && symbol.len() > quote.len() {
            return (symbol[..symbol.len() - quote.len()].to_string(), quote.to_string());
        }
    }
    (symbol.to_string(), String::new())
}
