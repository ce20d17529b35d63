//! Trade record sinks (SPEC_FULL §10.5): durability for emitted `TradeRecord`s
//! is external to the engine, but this crate supplies two ready-to-use
//! implementations so it runs end to end without an operator wiring one in.

use crate::error::Error;
use async_trait::async_trait;
use common::TradeRecord;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Durability boundary for trade records. The engine never retries a failed
/// emission (spec §6); the caller maps emission failure to `RECORD_EMIT_FAILED`.
#[async_trait]
pub trait TradeRecordSink: Send + Sync {
    async fn emit(&self, record: &TradeRecord) -> Result<(), Error>;
}

/// Append-only newline-delimited JSON file sink, the default "durable-ish" sink.
pub struct JsonlFileSink {
    file: Mutex<tokio::fs::File>,
}

impl JsonlFileSink {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let file = tokio::fs::OpenOptions::new().create(true).append(true).open(path.into()).await?;
        Ok(Self { file: Mutex::new(file) })
    }
}

#[async_trait]
impl TradeRecordSink for JsonlFileSink {
    async fn emit(&self, record: &TradeRecord) -> Result<(), Error> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Mirrors trade records onto a NATS subject for process-external consumers,
/// following `adapters::nats`'s connect/publish pattern.
pub struct NatsRecordSink {
    client: async_nats::Client,
    subject: String,
}

impl NatsRecordSink {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self { client, subject: subject.into() }
    }
}

#[async_trait]
impl TradeRecordSink for NatsRecordSink {
    async fn emit(&self, record: &TradeRecord) -> Result<(), Error> {
        let payload = serde_json::to_vec(record)?;
        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| Error::Sink(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Cycle, Exchange, FixedQuantity};
    use uuid::Uuid;

    fn record() -> TradeRecord {
        TradeRecord::attempt(
            Uuid::new_v4(),
            chrono::Utc::now(),
            Exchange::new("kucoin"),
            Cycle::new("USDT", "KCS", "BTC"),
            FixedQuantity::from_f64(20.0, 8),
            0.3,
        )
    }

    #[tokio::test]
    async fn jsonl_sink_appends_one_line_per_emit() {
        let dir = std::env::temp_dir().join(format!("arb-sink-test-{}", Uuid::new_v4()));
        let sink = JsonlFileSink::open(&dir).await.unwrap();
        sink.emit(&record()).await.unwrap();
        sink.emit(&record()).await.unwrap();
        let contents = tokio::fs::read_to_string(&dir).await.unwrap();
        assert_eq!(contents.lines().count(), 2);
        let _ = tokio::fs::remove_file(&dir).await;
    }
}
