//! Top-of-book market data as fetched by the Freshness Probe (spec §3, §4.2).

use crate::{
    precision::{FixedPrice, FixedQuantity},
    types::{Exchange, Symbol},
};
use serde::{Deserialize, Serialize};

/// A single price/size level of an orderbook side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: FixedPrice,
    pub quantity: FixedQuantity,
}

impl OrderBookEntry {
    pub fn new(price: FixedPrice, quantity: FixedQuantity) -> Self {
        Self { price, quantity }
    }
}

/// A snapshot of one symbol's orderbook at one venue, as returned by
/// `VenueAdapter::get_orderbook`. Bids and asks are Structure-of-Arrays,
/// each kept sorted best-first (descending bids, ascending asks) so the
/// top of book is always index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookSnapshot {
    pub exchange: Exchange,
    pub symbol: Symbol,
    pub captured_at_ms: u64,

    pub bid_prices: Vec<FixedPrice>,
    pub bid_quantities: Vec<FixedQuantity>,
    pub ask_prices: Vec<FixedPrice>,
    pub ask_quantities: Vec<FixedQuantity>,

    /// Set by the Freshness Probe when this snapshot was fetched under the
    /// reciprocal symbol (e.g. BTC/KCS instead of KCS/BTC) after the direct
    /// fetch failed. The Revalidator flips bid/ask interpretation accordingly.
    pub inverted: bool,
}

impl OrderbookSnapshot {
    pub fn new(exchange: Exchange, symbol: Symbol, captured_at_ms: u64) -> Self {
        Self {
            exchange,
            symbol,
            captured_at_ms,
            bid_prices: Vec::new(),
            bid_quantities: Vec::new(),
            ask_prices: Vec::new(),
            ask_quantities: Vec::new(),
            inverted: false,
        }
    }

    pub fn invert(mut self) -> Self {
        self.inverted = true;
        self
    }

    pub fn add_bid(&mut self, price: FixedPrice, quantity: FixedQuantity) {
        let pos = self
            .bid_prices
            .binary_search_by(|p| price.partial_cmp(p).unwrap())
            .unwrap_or_else(|pos| pos);
        self.bid_prices.insert(pos, price);
        self.bid_quantities.insert(pos, quantity);
    }

    pub fn add_ask(&mut self, price: FixedPrice, quantity: FixedQuantity) {
        let pos = self
            .ask_prices
            .binary_search_by(|p| p.partial_cmp(&price).unwrap())
            .unwrap_or_else(|pos| pos);
        self.ask_prices.insert(pos, price);
        self.ask_quantities.insert(pos, quantity);
    }

    pub fn best_bid(&self) -> Option<OrderBookEntry> {
        self.bid_prices
            .first()
            .copied()
            .map(|price| OrderBookEntry::new(price, self.bid_quantities[0]))
    }

    pub fn best_ask(&self) -> Option<OrderBookEntry> {
        self.ask_prices
            .first()
            .copied()
            .map(|price| OrderBookEntry::new(price, self.ask_quantities[0]))
    }

    /// Required by revalidation: both sides must carry at least one level.
    pub fn has_two_sided_book(&self) -> bool {
        !self.bid_prices.is_empty() && !self.ask_prices.is_empty()
    }

    pub fn spread(&self) -> Option<FixedPrice> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> OrderbookSnapshot {
        let mut ob = OrderbookSnapshot::new(Exchange::new("kucoin"), Symbol::new("KCSUSDT"), 1_000);
        ob.add_bid(FixedPrice::from_f64(9.99, 8), FixedQuantity::from_f64(1.0, 8));
        ob.add_bid(FixedPrice::from_f64(9.98, 8), FixedQuantity::from_f64(5.0, 8));
        ob.add_ask(FixedPrice::from_f64(10.0, 8), FixedQuantity::from_f64(2.0, 8));
        ob.add_ask(FixedPrice::from_f64(10.01, 8), FixedQuantity::from_f64(5.0, 8));
        ob
    }

    #[test]
    fn best_bid_and_ask_are_top_of_book() {
        let ob = book();
        assert_eq!(ob.best_bid().unwrap().price.to_f64(), 9.99);
        assert_eq!(ob.best_ask().unwrap().price.to_f64(), 10.0);
        assert!(ob.has_two_sided_book());
    }

    #[test]
    fn empty_side_fails_two_sided_check() {
        let mut ob = OrderbookSnapshot::new(Exchange::new("kucoin"), Symbol::new("KCSUSDT"), 1_000);
        ob.add_ask(FixedPrice::from_f64(10.0, 8), FixedQuantity::from_f64(2.0, 8));
        assert!(!ob.has_two_sided_book());
    }

    #[test]
    fn spread_is_ask_minus_bid() {
        let ob = book();
        assert_eq!(ob.spread().unwrap().to_f64(), 0.01);
    }

    #[test]
    fn invert_sets_flag() {
        let ob = book().invert();
        assert!(ob.inverted);
    }
}
