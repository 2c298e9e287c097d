use std::path::Path;

use flowarden_rules::EvaluationMode;
use serde::Deserialize;
use tracing::info;

use crate::error::ServerError;

/// Top-level configuration for the Flowarden server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct FlowardenConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Rule engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Startup seed configuration.
    #[serde(default)]
    pub seeds: SeedsConfig,
}

impl FlowardenConfig {
    /// Load the file at `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long shutdown waits for events still being processed in the
    /// background.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
        }
    }
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    3001
}

#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    /// Mode for rules that do not declare one.
    #[serde(default)]
    pub default_evaluation_mode: EvaluationMode,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedsConfig {
    /// YAML or JSON seed file applied at startup.
    pub path: Option<String>,
}
