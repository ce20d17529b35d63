use thiserror::Error;

/// Top-level orchestrator error: configuration, transport and sink failures
/// that occur outside the per-cycle `ExecutionError` path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("NATS connection error: {0}")]
    NatsConnection(#[from] async_nats::Error),

    #[error("execution error: {0}")]
    Execution(#[from] strategy::ExecutionError),

    #[error("trade record sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
