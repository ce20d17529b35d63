//! Connection setup for the NATS-backed trade record sink
//! (SPEC_FULL §10.5, `orchestrator::sink::NatsRecordSink`).

use async_nats::{Client, ConnectOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// NATS adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NatsConfig {
    pub servers: Vec<String>,
    pub name: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://127.0.0.1:4222".to_string()],
            name: "arb-executor".to_string(),
            token: None,
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Connects to NATS using the given configuration, applying credentials in
/// priority order token > username/password > anonymous.
pub async fn connect(config: &NatsConfig) -> Result<Client, async_nats::Error> {
    let mut options = ConnectOptions::new()
        .name(&config.name)
        .connection_timeout(config.connect_timeout);

    if let Some(token) = &config.token {
        options = options.token(token.clone());
    } else if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        options = options.user_and_password(user.clone(), pass.clone());
    }

    options.connect(config.servers.join(",")).await
}
