//! Execution context: the `ExecutionConfig` plus the venue adapter registry
//! shared by every controller instance.

use adapters::VenueAdapter;
use common::{AtomicCounter, ExecutionConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// Counters tracked across the lifetime of one controller, read by
/// `orchestrator::metrics` (SPEC_FULL §10.6).
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    pub opportunities_admitted: AtomicCounter,
    pub opportunities_rejected: AtomicCounter,
    pub cycles_succeeded: AtomicCounter,
    pub cycles_failed: AtomicCounter,
}

/// Shared resources a controller needs to admit and execute opportunities:
/// the tunable configuration and a handle to each venue it trades on.
///
/// There is no global mutable state here beyond what this struct owns
/// (SPEC_FULL §5): a fresh `ExecutionContext` gives a fresh, independent
/// controller no data is shared across users.
pub struct ExecutionContext {
    pub config: Arc<parking_lot::RwLock<ExecutionConfig>>,
    venues: HashMap<String, Arc<dyn VenueAdapter>>,
    pub metrics: Arc<ExecutionMetrics>,
}

impl ExecutionContext {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config: Arc::new(parking_lot::RwLock::new(config)),
            venues: HashMap::new(),
            metrics: Arc::new(ExecutionMetrics::default()),
        }
    }

    pub fn register_venue(&mut self, exchange_id: impl Into<String>, venue: Arc<dyn VenueAdapter>) {
        self.venues.insert(exchange_id.into(), venue);
    }

    pub fn venue(&self, exchange_id: &str) -> Option<Arc<dyn VenueAdapter>> {
        self.venues.get(exchange_id).cloned()
    }

    pub fn config_snapshot(&self) -> ExecutionConfig {
        self.config.read().clone()
    }
}
