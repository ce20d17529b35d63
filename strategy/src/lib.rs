//! Execution-time strategy components: the Freshness Probe, Revalidator and
//! Leg Sequencer that sit between opportunity admission and trade recording
//! (spec §4.2-§4.4).

pub mod context;
pub mod errors;
pub mod probe;
pub mod revalidate;
pub mod sequencer;

pub use context::{ExecutionContext, ExecutionMetrics};
pub use errors::{ExecutionError, ExecutionResult};
pub use probe::FreshnessProbe;
pub use revalidate::{RevalidationOutcome, Revalidator};
pub use sequencer::{LegSequencer, SequencerOutcome};
