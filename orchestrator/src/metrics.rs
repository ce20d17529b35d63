//! Prometheus-style metrics for the execution controller (SPEC_FULL §10.6):
//! opportunities admitted/executed/failed, per-state latency, realized P&L.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub opportunities_admitted: u64,
    pub opportunities_rejected: u64,
    pub cycles_succeeded: u64,
    pub cycles_failed: u64,
    pub total_realized_profit: f64,
    pub uptime_seconds: u64,
}

pub struct MetricsCollector {
    start_time: Instant,
    opportunities_admitted: u64,
    opportunities_rejected: u64,
    cycles_succeeded: u64,
    cycles_failed: u64,
    total_realized_profit: f64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        describe_counter!("opportunities_admitted_total", "Opportunities that passed admission and revalidation");
        describe_counter!("opportunities_rejected_total", "Opportunities rejected before leg 1, by reason");
        describe_counter!("cycles_succeeded_total", "Cycles that completed all three legs");
        describe_counter!("cycles_failed_total", "Cycles that aborted mid-cycle");
        describe_histogram!("controller_state_latency_ms", "Time spent in each controller state");
        describe_gauge!("realized_profit_total", "Cumulative realized P&L across all cycles");

        Self {
            start_time: Instant::now(),
            opportunities_admitted: 0,
            opportunities_rejected: 0,
            cycles_succeeded: 0,
            cycles_failed: 0,
            total_realized_profit: 0.0,
        }
    }

    pub fn record_admitted(&mut self) {
        self.opportunities_admitted += 1;
        counter!("opportunities_admitted_total").increment(1);
    }

    pub fn record_rejected(&mut self, reason: &'static str) {
        self.opportunities_rejected += 1;
        counter!("opportunities_rejected_total", "reason" => reason).increment(1);
    }

    pub fn record_success(&mut self, realized_profit: f64) {
        self.cycles_succeeded += 1;
        self.total_realized_profit += realized_profit;
        counter!("cycles_succeeded_total").increment(1);
        gauge!("realized_profit_total").set(self.total_realized_profit);
    }

    pub fn record_failure(&mut self) {
        self.cycles_failed += 1;
        counter!("cycles_failed_total").increment(1);
    }

    pub fn record_state_latency(&self, state: &'static str, duration_ms: f64) {
        histogram!("controller_state_latency_ms", "state" => state).record(duration_ms);
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            opportunities_admitted: self.opportunities_admitted,
            opportunities_rejected: self.opportunities_rejected,
            cycles_succeeded: self.cycles_succeeded,
            cycles_failed: self.cycles_failed,
            total_realized_profit: self.total_realized_profit,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct MetricsHandle {
    collector: Arc<RwLock<MetricsCollector>>,
}

impl MetricsHandle {
    pub fn new() -> Self {
        Self { collector: Arc::new(RwLock::new(MetricsCollector::new())) }
    }

    pub fn collector(&self) -> Arc<RwLock<MetricsCollector>> {
        self.collector.clone()
    }

    pub fn record_admitted(&self) {
        self.collector.write().record_admitted();
    }

    pub fn record_rejected(&self, reason: &'static str) {
        self.collector.write().record_rejected(reason);
    }

    pub fn record_success(&self, realized_profit: f64) {
        self.collector.write().record_success(realized_profit);
    }

    pub fn record_failure(&self) {
        self.collector.write().record_failure();
    }

    pub fn record_state_latency(&self, state: &'static str, duration_ms: f64) {
        self.collector.read().record_state_latency(state, duration_ms);
    }

    pub fn summary(&self) -> MetricsSummary {
        self.collector.read().summary()
    }
}

impl Default for MetricsHandle {
    fn default() -> Self {
        Self::new()
    }
}
