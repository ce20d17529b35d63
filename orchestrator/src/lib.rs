//! Orchestration layer: configuration, the Execution Controller, trade
//! recording and sinks, and metrics, wiring `strategy`'s per-cycle
//! components and `adapters`'s venues into a runnable engine.

pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod recorder;
pub mod sink;

pub use config::{ConfigChangeEvent, HotReloadConfigManager, SystemConfig};
pub use controller::{new_cancellation_token, CancellationToken, ConfirmationReceiver, ExecutionController};
pub use error::Error;
pub use metrics::{MetricsCollector, MetricsHandle, MetricsSummary};
pub use recorder::TradeRecorder;
pub use sink::{JsonlFileSink, NatsRecordSink, TradeRecordSink};
