//! The Venue Adapter contract (spec §4.1): a uniform interface to one
//! exchange, hiding per-venue quirks behind the four operations below.

use crate::error::AdapterResult;
use common::{FixedPrice, FixedQuantity, LegResult, OrderbookSnapshot, Side, Symbol};
use serde::{Deserialize, Serialize};

/// Tick size, lot step and minimum notional for one symbol, as reported by
/// `VenueAdapter::symbol_info`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub tick_size: FixedPrice,
    pub lot_step: FixedQuantity,
    pub min_notional: FixedPrice,
}

/// Fee schedule and discount token reported by a venue for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub taker_fee_pct: f64,
    pub discount_token: String,
    pub discount_pct: f64,
    pub discount_token_held: bool,
}

/// Credentials for one venue account. Loaded by configuration (SPEC_FULL
/// §10.3); never logged in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: Option<String>,
    pub sandbox: bool,
}

/// Uniform interface to one exchange (spec §4.1). The rest of the engine
/// assumes only this contract; the adapter owns all venue-specific
/// normalization.
#[async_trait::async_trait]
pub trait VenueAdapter: Send + Sync {
    /// Fetches at least top-of-book for both sides while the market is
    /// open. Fails with `AdapterError::NoLiquidity` otherwise.
    async fn get_orderbook(&self, symbol: &Symbol, depth: u32) -> AdapterResult<OrderbookSnapshot>;

    /// Places a market order. `quantity` semantics: for `Side::Buy`,
    /// quantity is in quote currency (amount to spend); for `Side::Sell`,
    /// quantity is in base currency (amount to sell). Returns after the
    /// order reaches a terminal state.
    async fn place_market_order(
        &self,
        symbol: &Symbol,
        side: Side,
        quantity: FixedQuantity,
    ) -> AdapterResult<LegResult>;

    /// Recomputes the server/client clock offset and stores it for
    /// subsequent request signing. Returns the measured drift in ms.
    async fn sync_time(&self) -> AdapterResult<i64>;

    async fn symbol_info(&self, symbol: &Symbol) -> AdapterResult<SymbolInfo>;

    async fn fee_schedule(&self, symbol: &Symbol) -> AdapterResult<FeeSchedule>;

    /// Last `sync_time` measurement, read lock-free on the hot path
    /// (SPEC_FULL §5 shared-resource model).
    fn time_skew_ms(&self) -> i64;

    fn name(&self) -> &'static str;
}
