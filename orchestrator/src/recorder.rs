//! Trade Recorder (spec §4.5): constructs the ATTEMPT/SUCCESS/FAILED records
//! for one cycle and emits each to the configured sink. Records are
//! monotonic — ATTEMPT is written once, then exactly one terminal mutation.

use crate::error::Error;
use crate::sink::TradeRecordSink;
use chrono::Utc;
use common::{Cycle, ErrorKind, Exchange, FixedQuantity, TradeRecord};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct TradeRecorder {
    sink: Arc<dyn TradeRecordSink>,
}

impl TradeRecorder {
    pub fn new(sink: Arc<dyn TradeRecordSink>) -> Self {
        Self { sink }
    }

    /// Writes the ATTEMPT record, immediately upon admission past the
    /// Revalidator's gate, and returns it so the caller can terminal-mutate
    /// and re-emit it later.
    pub async fn attempt(
        &self,
        exchange: Exchange,
        cycle: Cycle,
        funding_used: FixedQuantity,
        expected_profit_pct: f64,
    ) -> Result<TradeRecord, Error> {
        let record = TradeRecord::attempt(Uuid::new_v4(), Utc::now(), exchange, cycle, funding_used, expected_profit_pct);
        self.sink.emit(&record).await.map_err(|_| Error::Execution(strategy::ExecutionError::new(
            ErrorKind::RecordEmitFailed,
            "failed to emit ATTEMPT record",
        )))?;
        Ok(record)
    }

    pub async fn success(&self, mut record: TradeRecord, final_amount: FixedQuantity, fees: FixedQuantity, duration_ms: u64) -> Result<TradeRecord, Error> {
        record.complete_success(final_amount, fees, duration_ms);
        self.emit_terminal(&record).await?;
        Ok(record)
    }

    pub async fn failed(
        &self,
        mut record: TradeRecord,
        error_kind: ErrorKind,
        failed_leg_index: u8,
        fees: FixedQuantity,
        duration_ms: u64,
    ) -> Result<TradeRecord, Error> {
        record.complete_failed(error_kind, failed_leg_index, fees, duration_ms);
        self.emit_terminal(&record).await?;
        Ok(record)
    }

    /// Terminal-mutates an ATTEMPT record into FAILED for a cancellation
    /// observed after admission but before leg 1 (spec §5).
    pub async fn cancelled(&self, mut record: TradeRecord, duration_ms: u64) -> Result<TradeRecord, Error> {
        record.complete_cancelled(duration_ms);
        self.emit_terminal(&record).await?;
        Ok(record)
    }

    async fn emit_terminal(&self, record: &TradeRecord) -> Result<(), Error> {
        self.sink.emit(record).await?;
        // Best-effort line for an orchestration parent (spec §6), independent
        // of the structured log stream.
        let line = serde_json::json!({
            "exchange": record.exchange.as_str(),
            "cycle": record.cycle.to_string(),
            "initial": record.initial.to_f64(),
            "final": record.final_amount.to_f64(),
            "profit": record.actual_profit.map(|p| p.to_f64()),
            "profit_pct": record.actual_profit_pct,
            "fees": record.fees.to_f64(),
            "status": format!("{:?}", record.status),
            "duration_ms": record.duration_ms,
            "ts": record.ts,
        });
        info!(target: "trade_completed", "TRADE_COMPLETED: {line}");
        Ok(())
    }
}
