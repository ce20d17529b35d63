//! Execution engine configuration (spec §3, §6).

use crate::precision::FixedQuantity;
use serde::{Deserialize, Serialize};

/// Tunables recognized by the engine. Everything except `funding_cap` is
/// safe to hot-reload while the controller is IDLE (SPEC_FULL §10.3);
/// `funding_cap` never applies mid-cycle so a reload cannot retroactively
/// raise or lower a cycle already in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Hard ceiling on leg-1 funding, in C0 units, regardless of the
    /// opportunity's requested `initial_amount`.
    pub funding_cap: FixedQuantity,
    /// Minimum net profit percent required to proceed past REVALIDATING.
    pub revalidation_threshold_pct: f64,
    /// Exchange taker fee, applied per leg.
    pub per_leg_fee_pct: f64,
    /// Venue-native fee discount token (e.g. "KCS").
    pub fee_token: String,
    /// Discount fraction applied when `fee_token` is held and active.
    pub fee_discount: f64,
    /// Whether the discount token condition currently holds; set by an
    /// external balance poller, read only by the Revalidator.
    pub fee_discount_active: bool,
    pub time_sync_buffer_ms: u64,
    pub orderbook_depth: u32,
    pub parallel_probe: bool,
    pub require_manual_confirm: bool,
    /// Aggregate deadline for the Freshness Probe (spec §4.2, default 200ms).
    pub probe_deadline_ms: u64,
    /// Deadline from PROBING start to end of leg-3 submission (spec §4.6, default 2s).
    pub cycle_deadline_ms: u64,
    /// Deadline to wait for an external confirmation token when
    /// `require_manual_confirm` is set.
    pub manual_confirm_deadline_ms: u64,
}

impl ExecutionConfig {
    /// `3 × per_leg_fee_pct × (1 − fee_discount)`, applied only if the
    /// discount token is currently held and active (spec §4.3).
    pub fn total_fee_pct(&self) -> f64 {
        let discount = if self.fee_discount_active { self.fee_discount } else { 0.0 };
        3.0 * self.per_leg_fee_pct * (1.0 - discount)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            funding_cap: FixedQuantity::from_f64(100.0, 8),
            revalidation_threshold_pct: 0.8,
            per_leg_fee_pct: 0.1,
            fee_token: String::new(),
            fee_discount: 0.0,
            fee_discount_active: false,
            time_sync_buffer_ms: 500,
            orderbook_depth: 5,
            parallel_probe: true,
            require_manual_confirm: false,
            probe_deadline_ms: 200,
            cycle_deadline_ms: 2_000,
            manual_confirm_deadline_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_fee_pct_applies_discount_only_when_active() {
        let mut config = ExecutionConfig {
            per_leg_fee_pct: 0.08,
            fee_discount: 0.2,
            fee_discount_active: true,
            ..Default::default()
        };
        assert!((config.total_fee_pct() - 0.192).abs() < 1e-9);

        config.fee_discount_active = false;
        assert!((config.total_fee_pct() - 0.24).abs() < 1e-9);
    }
}
