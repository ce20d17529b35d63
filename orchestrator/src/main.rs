//! Binary entry point: loads configuration, wires a venue per configured
//! exchange, and drives the Execution Controller from opportunities
//! received on a NATS subject (the Detector is external to this engine;
//! see SPEC_FULL §1/§2).

use anyhow::{Context, Result};
use clap::Parser;
use common::Opportunity;
use futures::StreamExt;
use orchestrator::{ExecutionController, HotReloadConfigManager, JsonlFileSink, MetricsHandle, TradeRecorder, TradeRecordSink};
use std::sync::Arc;
use strategy::ExecutionContext;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "arb-executor", about = "Triangular arbitrage execution engine")]
struct Cli {
    /// Path to the layered TOML configuration (without extension), e.g. "config/production".
    #[arg(long, default_value = "config/default")]
    config: String,

    /// Subject to receive candidate opportunities on.
    #[arg(long, default_value = "arb.opportunities")]
    opportunities_subject: String,

    /// Optional subject to mirror trade records to, in addition to the JSONL sink.
    #[arg(long)]
    records_subject: Option<String>,

    /// Path to the append-only JSONL trade record file.
    #[arg(long, default_value = "trade_records.jsonl")]
    records_path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = HotReloadConfigManager::new(cli.config.clone()).context("loading configuration")?;
    let system_config = config_manager.current();
    init_tracing(&system_config.logging);

    info!(config = %cli.config, "configuration loaded");

    let nats_client = adapters::nats::connect(&system_config.nats).await.context("connecting to NATS")?;

    let sink: Arc<dyn TradeRecordSink> = if let Some(subject) = &cli.records_subject {
        Arc::new(orchestrator::NatsRecordSink::new(nats_client.clone(), subject.clone()))
    } else {
        Arc::new(JsonlFileSink::open(&cli.records_path).await.context("opening trade record sink")?)
    };
    let recorder = Arc::new(TradeRecorder::new(sink));

    let execution_config = system_config.execution.clone();
    let mut context = ExecutionContext::new(execution_config);
    for (exchange_id, _credentials) in &system_config.venues {
        // A production deployment supplies a real `VenueAdapter` per exchange
        // here; the in-memory reference adapter exercises the same contract.
        let venue = Arc::new(adapters::SimulatedVenueAdapter::new(exchange_id.clone()));
        context.register_venue(exchange_id.clone(), venue);
    }
    if system_config.venues.is_empty() {
        warn!("no venues configured; registering a default simulated venue named 'default'");
        context.register_venue("default", Arc::new(adapters::SimulatedVenueAdapter::new("default")));
    }

    let metrics = MetricsHandle::new();
    let controller = Arc::new(ExecutionController::with_metrics(Arc::new(context), recorder, metrics));

    let mut subscriber = nats_client
        .subscribe(cli.opportunities_subject.clone())
        .await
        .context("subscribing to opportunities subject")?;
    info!(subject = %cli.opportunities_subject, "listening for opportunities");

    loop {
        tokio::select! {
            message = subscriber.next() => {
                let Some(message) = message else { break };
                match serde_json::from_slice::<Opportunity>(&message.payload) {
                    Ok(opportunity) => {
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            let result = controller.admit(opportunity, None, None).await;
                            info!(%result, "opportunity admission result");
                        });
                    }
                    Err(e) => error!(error = %e, "failed to parse opportunity message"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("execution engine shut down");
    Ok(())
}

fn init_tracing(logging: &orchestrator::config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_new(&logging.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
