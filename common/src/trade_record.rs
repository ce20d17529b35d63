//! Durable output of one admitted cycle (spec §3, §4.5).

use crate::errors::ErrorKind;
use crate::opportunity::Cycle;
use crate::precision::FixedQuantity;
use crate::types::Exchange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Attempt,
    Success,
    Failed,
}

/// A trade record is created once at ATTEMPT and terminal-mutated exactly
/// once, to SUCCESS or FAILED (spec §4.5, testable property 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: Uuid,
    pub ts: DateTime<Utc>,
    pub exchange: Exchange,
    pub cycle: Cycle,
    pub status: TradeStatus,
    pub initial: FixedQuantity,
    pub final_amount: FixedQuantity,
    pub expected_profit_pct: f64,
    pub actual_profit: Option<FixedQuantity>,
    pub actual_profit_pct: Option<f64>,
    pub fees: FixedQuantity,
    pub duration_ms: u64,
    pub error_kind: Option<ErrorKind>,
    /// 0 if the failure occurred before leg 1, otherwise the 1-based leg
    /// index at which the cycle stopped.
    pub failed_leg_index: Option<u8>,
    /// Set when a failure occurred after leg 1: the account now holds a
    /// position outside C0 and needs out-of-band reconciliation.
    pub desynchronized: bool,
    pub cancelled_post_admit: bool,
}

impl TradeRecord {
    /// Creates the ATTEMPT record, written immediately upon admission past
    /// the Revalidator's gate.
    pub fn attempt(
        trade_id: Uuid,
        ts: DateTime<Utc>,
        exchange: Exchange,
        cycle: Cycle,
        initial: FixedQuantity,
        expected_profit_pct: f64,
    ) -> Self {
        Self {
            trade_id,
            ts,
            exchange,
            cycle,
            status: TradeStatus::Attempt,
            initial,
            final_amount: initial,
            expected_profit_pct,
            actual_profit: None,
            actual_profit_pct: None,
            fees: FixedQuantity::from_raw(0, initial.scale()),
            duration_ms: 0,
            error_kind: None,
            failed_leg_index: None,
            desynchronized: false,
            cancelled_post_admit: false,
        }
    }

    /// Terminal-mutates an ATTEMPT record into SUCCESS. `final_amount` is
    /// `ledger[2]`; `actual_profit = ledger[2] - funding_used`.
    pub fn complete_success(&mut self, final_amount: FixedQuantity, fees: FixedQuantity, duration_ms: u64) {
        let profit = final_amount - self.initial;
        let profit_pct = if self.initial.to_f64() != 0.0 {
            (profit.to_f64() / self.initial.to_f64()) * 100.0
        } else {
            0.0
        };
        self.status = TradeStatus::Success;
        self.final_amount = final_amount;
        self.actual_profit = Some(profit);
        self.actual_profit_pct = Some(profit_pct);
        self.fees = fees;
        self.duration_ms = duration_ms;
    }

    /// Terminal-mutates an ATTEMPT record into FAILED. No P&L claim is made:
    /// `final_amount` is reported as the funding amount (spec §4.5).
    pub fn complete_failed(
        &mut self,
        error_kind: ErrorKind,
        failed_leg_index: u8,
        fees: FixedQuantity,
        duration_ms: u64,
    ) {
        self.status = TradeStatus::Failed;
        self.final_amount = self.initial;
        self.actual_profit = None;
        self.actual_profit_pct = None;
        self.fees = fees;
        self.duration_ms = duration_ms;
        self.error_kind = Some(error_kind);
        self.failed_leg_index = Some(failed_leg_index);
        self.desynchronized = failed_leg_index > 1;
    }

    /// Terminal-mutates an ATTEMPT record into FAILED for a cancellation
    /// observed after admission but before leg 1 (spec §5). No leg ran, so
    /// no fee was paid and the account holds no foreign position.
    pub fn complete_cancelled(&mut self, duration_ms: u64) {
        self.status = TradeStatus::Failed;
        self.final_amount = self.initial;
        self.actual_profit = None;
        self.actual_profit_pct = None;
        self.fees = FixedQuantity::from_raw(0, self.initial.scale());
        self.duration_ms = duration_ms;
        self.error_kind = Some(ErrorKind::Cancelled);
        self.failed_leg_index = Some(0);
        self.desynchronized = false;
        self.cancelled_post_admit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record() -> TradeRecord {
        TradeRecord::attempt(
            Uuid::new_v4(),
            Utc::now(),
            Exchange::new("kucoin"),
            Cycle::new("USDT", "KCS", "BTC"),
            FixedQuantity::from_f64(20.0, 8),
            0.3,
        )
    }

    #[test]
    fn success_computes_profit_pct() {
        let mut record = new_record();
        record.complete_success(FixedQuantity::from_f64(20.0416, 8), FixedQuantity::from_f64(0.0384, 8), 120);
        assert_eq!(record.status, TradeStatus::Success);
        let pct = record.actual_profit_pct.unwrap();
        assert!((pct - 0.208).abs() < 0.01);
    }

    #[test]
    fn failure_after_leg_one_is_desynchronized() {
        let mut record = new_record();
        record.complete_failed(ErrorKind::Rejected, 2, FixedQuantity::from_raw(0, 8), 80);
        assert!(record.desynchronized);
        assert_eq!(record.final_amount.to_f64(), 20.0);
    }

    #[test]
    fn below_threshold_failure_before_leg_one_is_not_desynchronized() {
        let mut record = new_record();
        record.complete_failed(ErrorKind::BelowThreshold, 0, FixedQuantity::from_raw(0, 8), 10);
        assert!(!record.desynchronized);
    }

    #[test]
    fn cancellation_sets_cancelled_post_admit() {
        let mut record = new_record();
        record.complete_cancelled(15);
        assert_eq!(record.status, TradeStatus::Failed);
        assert!(record.cancelled_post_admit);
        assert!(!record.desynchronized);
        assert_eq!(record.error_kind, Some(ErrorKind::Cancelled));
    }
}
