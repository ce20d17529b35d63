//! The Venue Adapter contract and reference implementations (spec §4.1).
//!
//! Real venue integrations (KuCoin, Binance, ...) live outside this crate
//! as additional `VenueAdapter` implementors; this crate defines the
//! contract and ships a simulated venue used by the orchestrator's
//! integration tests.

pub mod error;
pub mod nats;
pub mod simulated;
pub mod venue;

pub use error::{AdapterError, AdapterResult};
pub use simulated::SimulatedVenueAdapter;
pub use venue::{FeeSchedule, SymbolInfo, VenueAdapter, VenueCredentials};
