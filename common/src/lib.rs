pub mod atomic_types;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod leg;
pub mod market_data;
pub mod opportunity;
pub mod precision;
pub mod trade_record;
pub mod types;

pub use atomic_types::{AtomicCounter, AtomicFlag};
pub use config::ExecutionConfig;
pub use errors::{ErrorKind, ErrorResult};
pub use ledger::AmountLedger;
pub use leg::LegResult;
pub use market_data::{OrderBookEntry, OrderbookSnapshot};
pub use opportunity::{Cycle, Opportunity, Step};
pub use precision::{FixedPrice, FixedQuantity};
pub use trade_record::{TradeRecord, TradeStatus};
pub use types::{AdmissionResult, Currency, Exchange, Side, Symbol};
