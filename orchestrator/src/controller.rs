//! Execution Controller (spec §4.6): the single-flight state machine that
//! owns an opportunity from admission through trade recording.
//!
//! `IDLE → ADMITTING → PROBING → REVALIDATING → PRESYNC → EXECUTING →
//! RECORDING_OK/RECORDING_FAIL → IDLE`. There is no queue: while a cycle is
//! in flight, every other opportunity is rejected `BUSY` (testable
//! property 4).

use crate::metrics::MetricsHandle;
use crate::recorder::TradeRecorder;
use common::{AdmissionResult, AtomicFlag, ErrorKind, FixedQuantity, Opportunity};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strategy::{ExecutionContext, FreshnessProbe, Revalidator, LegSequencer, SequencerOutcome};
use tracing::{info_span, warn, Instrument};

/// A confirmation channel for `require_manual_confirm` admission (spec §6):
/// the caller resolves it with `true` to proceed, or drops it / sends
/// `false` to abort as `UNCONFIRMED`.
pub type ConfirmationReceiver = tokio::sync::oneshot::Receiver<bool>;

/// Shared cancellation flag (spec §5): the caller sets it to withdraw an
/// opportunity. Honored only at the three checkpoints named below —
/// EXECUTING always runs to a consistent tail state once it starts.
pub type CancellationToken = Arc<AtomicFlag>;

pub fn new_cancellation_token() -> CancellationToken {
    Arc::new(AtomicFlag::new(false))
}

pub struct ExecutionController {
    context: Arc<ExecutionContext>,
    recorder: Arc<TradeRecorder>,
    metrics: MetricsHandle,
    in_flight: AtomicFlag,
}

impl ExecutionController {
    pub fn new(context: Arc<ExecutionContext>, recorder: Arc<TradeRecorder>) -> Self {
        Self::with_metrics(context, recorder, MetricsHandle::new())
    }

    pub fn with_metrics(context: Arc<ExecutionContext>, recorder: Arc<TradeRecorder>, metrics: MetricsHandle) -> Self {
        Self { context, recorder, metrics, in_flight: AtomicFlag::new(false) }
    }

    /// Opportunity intake (spec §6). Synchronous from the caller's
    /// perspective: returns only after the terminal `TradeRecord` has been
    /// emitted (or the opportunity was rejected pre-admission).
    pub async fn admit(
        &self,
        opportunity: Opportunity,
        confirmation: Option<ConfirmationReceiver>,
        cancellation: Option<CancellationToken>,
    ) -> AdmissionResult {
        if !self.in_flight.try_claim() {
            self.metrics.record_rejected("busy");
            return AdmissionResult::RejectedBusy;
        }
        let result = self.run_cycle(opportunity, confirmation, cancellation).await;
        self.in_flight.clear();
        result
    }

    async fn run_cycle(
        &self,
        opportunity: Opportunity,
        confirmation: Option<ConfirmationReceiver>,
        cancellation: Option<CancellationToken>,
    ) -> AdmissionResult {
        let span = info_span!("cycle", exchange = %opportunity.exchange, cycle = %opportunity.cycle);
        self.run_cycle_inner(opportunity, confirmation, cancellation).instrument(span).await
    }

    async fn run_cycle_inner(
        &self,
        opportunity: Opportunity,
        confirmation: Option<ConfirmationReceiver>,
        cancellation: Option<CancellationToken>,
    ) -> AdmissionResult {
        let cycle_start = Instant::now();
        let is_cancelled = || cancellation.as_ref().is_some_and(|token| token.is_set());

        // ADMITTING
        if opportunity.validate_shape().is_err() {
            self.context.metrics.opportunities_rejected.increment();
            self.metrics.record_rejected("malformed");
            return AdmissionResult::RejectedMalformed;
        }
        let Some(venue) = self.context.venue(opportunity.exchange.as_str()) else {
            self.context.metrics.opportunities_rejected.increment();
            self.metrics.record_rejected("malformed");
            return AdmissionResult::RejectedMalformed;
        };
        let config = self.context.config_snapshot();

        // Cancellation checkpoint: before PROBING.
        if is_cancelled() {
            self.metrics.record_rejected("cancelled");
            return AdmissionResult::RejectedCancelled;
        }

        // PROBING
        let probe_start = Instant::now();
        let probe = FreshnessProbe::new(venue.as_ref());
        let snapshots = match probe.probe(&opportunity, config.orderbook_depth, config.probe_deadline_ms).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                self.context.metrics.opportunities_rejected.increment();
                let reason = if e.kind == ErrorKind::Stale { "stale" } else { "thin_book" };
                self.metrics.record_rejected(reason);
                return match e.kind {
                    ErrorKind::Stale => AdmissionResult::RejectedStale,
                    _ => AdmissionResult::RejectedThinBook,
                };
            }
        };
        self.metrics.record_state_latency("probing", probe_start.elapsed().as_secs_f64() * 1000.0);

        // Cancellation checkpoint: between PROBING and REVALIDATING.
        if is_cancelled() {
            self.metrics.record_rejected("cancelled");
            return AdmissionResult::RejectedCancelled;
        }

        // REVALIDATING
        let revalidate_start = Instant::now();
        let sides = [opportunity.steps[0].side, opportunity.steps[1].side, opportunity.steps[2].side];
        let outcome = match Revalidator::revalidate(sides, &snapshots, opportunity.initial_amount, &config) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.context.metrics.opportunities_rejected.increment();
                let reason = if e.kind == ErrorKind::BelowThreshold { "below_threshold" } else { "thin_book" };
                self.metrics.record_rejected(reason);
                return match e.kind {
                    ErrorKind::BelowThreshold => AdmissionResult::RejectedThreshold,
                    _ => AdmissionResult::RejectedThinBook,
                };
            }
        };
        self.metrics.record_state_latency("revalidating", revalidate_start.elapsed().as_secs_f64() * 1000.0);
        self.context.metrics.opportunities_admitted.increment();
        self.metrics.record_admitted();

        let zero_fee = FixedQuantity::from_raw(0, opportunity.initial_amount.scale());
        let record = match self
            .recorder
            .attempt(opportunity.exchange.clone(), opportunity.cycle.clone(), outcome.funding_used, opportunity.expected_profit_pct)
            .await
        {
            Ok(record) => record,
            Err(_) => {
                self.context.metrics.cycles_failed.increment();
                self.metrics.record_failure();
                return AdmissionResult::ExecutedFail;
            }
        };

        // Cancellation checkpoint: before PRESYNC. An ATTEMPT record already
        // exists, so the cancellation is reported as a terminal FAILED
        // record with `cancelled_post_admit` set (spec §5).
        if is_cancelled() {
            let duration_ms = cycle_start.elapsed().as_millis() as u64;
            let _ = self.recorder.cancelled(record, duration_ms).await;
            self.context.metrics.cycles_failed.increment();
            self.metrics.record_failure();
            return AdmissionResult::RejectedCancelled;
        }

        // PRESYNC: manual confirmation gate, then venue clock sync.
        if config.require_manual_confirm {
            let confirmed = match confirmation {
                Some(rx) => tokio::time::timeout(Duration::from_millis(config.manual_confirm_deadline_ms), rx)
                    .await
                    .map(|r| r.unwrap_or(false))
                    .unwrap_or(false),
                None => false,
            };
            if !confirmed {
                let duration_ms = cycle_start.elapsed().as_millis() as u64;
                let _ = self.recorder.failed(record, ErrorKind::Unconfirmed, 0, zero_fee, duration_ms).await;
                self.context.metrics.cycles_failed.increment();
                self.metrics.record_failure();
                return AdmissionResult::RejectedUnconfirmed;
            }
        }

        if let Err(e) = venue.sync_time().await {
            let kind = ErrorKind::from(&e);
            let duration_ms = cycle_start.elapsed().as_millis() as u64;
            let _ = self.recorder.failed(record, kind, 0, zero_fee, duration_ms).await;
            self.context.metrics.cycles_failed.increment();
            self.metrics.record_failure();
            return AdmissionResult::ExecutedFail;
        }

        // EXECUTING: no longer cancellable, driven to a consistent tail state.
        let executing_start = Instant::now();
        let sequencer = LegSequencer::new(venue.as_ref());
        let seq_outcome = sequencer.run(&opportunity, outcome.funding_used).await;
        self.metrics.record_state_latency("executing", executing_start.elapsed().as_secs_f64() * 1000.0);

        let duration_ms = cycle_start.elapsed().as_millis() as u64;
        if duration_ms > config.cycle_deadline_ms {
            warn!(duration_ms, deadline_ms = config.cycle_deadline_ms, "cycle deadline breached; current leg still driven to completion");
        }

        match seq_outcome {
            SequencerOutcome::Success { ledger, legs } => {
                let final_amount = ledger.final_amount().expect("success ledger is always complete");
                let fees = total_fees(&legs, zero_fee);
                let profit = (final_amount - outcome.funding_used).to_f64();
                let _ = self.recorder.success(record, final_amount, fees, duration_ms).await;
                self.context.metrics.cycles_succeeded.increment();
                self.metrics.record_success(profit);
                AdmissionResult::ExecutedOk
            }
            SequencerOutcome::Failed { legs, failed_leg_index, error, .. } => {
                let fees = total_fees(&legs, zero_fee);
                let _ = self.recorder.failed(record, error.kind, failed_leg_index, fees, duration_ms).await;
                self.context.metrics.cycles_failed.increment();
                self.metrics.record_failure();
                AdmissionResult::ExecutedFail
            }
        }
    }
}

fn total_fees(legs: &[common::LegResult], zero: FixedQuantity) -> FixedQuantity {
    legs.iter().fold(zero, |acc, leg| acc + leg.fee_paid)
}
