//! Layered configuration with hot reload (SPEC_FULL §10.3).
//!
//! Everything in [`ExecutionConfig`] except `funding_cap` is safe to
//! reload while the controller is IDLE; `funding_cap` is pinned at
//! startup and never replaced by a running reload, since it must never
//! change mid-cycle.

use adapters::VenueCredentials;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load layered configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("file watcher error: {0}")]
    Watcher(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

/// The full on-disk configuration: execution tunables, one credential set
/// per venue, NATS connection settings and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub execution: common::ExecutionConfig,
    #[serde(default)]
    pub venues: HashMap<String, VenueCredentials>,
    #[serde(default)]
    pub nats: adapters::nats::NatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SystemConfig {
    /// Loads the base TOML file, then layers `ARB_`-prefixed environment
    /// variables on top (e.g. `ARB_EXECUTION__FUNDING_CAP`).
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("ARB").separator("__"));
        let raw = builder.build()?;
        Ok(raw.try_deserialize()?)
    }
}

/// Notification of which configuration section changed on reload.
#[derive(Debug, Clone)]
pub enum ConfigChangeEvent {
    ExecutionConfigChanged,
    VenuesChanged,
    NatsConfigChanged,
}

/// Watches the configuration file and republishes [`SystemConfig`] on
/// change, preserving the pinned `funding_cap` across reloads.
pub struct HotReloadConfigManager {
    config: Arc<parking_lot::RwLock<SystemConfig>>,
    pinned_funding_cap: common::FixedQuantity,
    change_tx: tokio::sync::broadcast::Sender<ConfigChangeEvent>,
    _watcher: Option<notify::RecommendedWatcher>,
    config_path: String,
}

impl HotReloadConfigManager {
    pub fn new(config_path: String) -> Result<Self, ConfigError> {
        let initial = SystemConfig::load(&config_path)?;
        let pinned_funding_cap = initial.execution.funding_cap;
        let (change_tx, _) = tokio::sync::broadcast::channel(64);
        let mut manager = Self {
            config: Arc::new(parking_lot::RwLock::new(initial)),
            pinned_funding_cap,
            change_tx,
            _watcher: None,
            config_path,
        };
        manager.watch()?;
        Ok(manager)
    }

    fn watch(&mut self) -> Result<(), ConfigError> {
        use notify::Watcher;

        let config_arc = self.config.clone();
        let change_tx = self.change_tx.clone();
        let config_path = self.config_path.clone();
        let pinned_funding_cap = self.pinned_funding_cap;

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            let Ok(event) = res else { return };
            if !matches!(event.kind, notify::EventKind::Modify(_)) {
                return;
            }
            match SystemConfig::load(&config_path) {
                Ok(mut reloaded) => {
                    reloaded.execution.funding_cap = pinned_funding_cap;
                    let mut guard = config_arc.write();
                    let execution_changed = guard.execution.revalidation_threshold_pct
                        != reloaded.execution.revalidation_threshold_pct
                        || guard.execution.per_leg_fee_pct != reloaded.execution.per_leg_fee_pct;
                    let venues_changed = guard.venues.len() != reloaded.venues.len();
                    *guard = reloaded;
                    drop(guard);
                    if execution_changed {
                        let _ = change_tx.send(ConfigChangeEvent::ExecutionConfigChanged);
                    }
                    if venues_changed {
                        let _ = change_tx.send(ConfigChangeEvent::VenuesChanged);
                    }
                }
                Err(e) => tracing::error!(error = %e, "failed to reload configuration"),
            }
        })
        .map_err(|e| ConfigError::Watcher(e.to_string()))?;

        if let Some(dir) = Path::new(&self.config_path).parent() {
            watcher
                .watch(dir, notify::RecursiveMode::NonRecursive)
                .map_err(|e| ConfigError::Watcher(e.to_string()))?;
        }
        self._watcher = Some(watcher);
        Ok(())
    }

    pub fn current(&self) -> SystemConfig {
        self.config.read().clone()
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ConfigChangeEvent> {
        self.change_tx.subscribe()
    }
}
