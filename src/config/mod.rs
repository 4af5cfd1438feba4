//! Configuration loaded from `$SWARMD_HOME/config.yaml`.
//!
//! Every section is optional; a missing or partial file falls back to
//! the documented defaults so `swarmd start` works out of the box.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Routing / task-decomposition settings.
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Text-handler settings.
    #[serde(default)]
    pub text: TextConfig,
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Bind address. Default: `127.0.0.1`.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port. Default: 7700. When taken, the next 9 ports are tried.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7700
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Routing / task-decomposition settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Maximum number of sub-clauses a compound request may decompose
    /// into before it is rejected. Default: 5.
    #[serde(default = "default_max_subtasks")]
    pub max_subtasks: usize,
    /// Maximum recursion depth for re-routed sub-clauses. Default: 5.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_subtasks() -> usize {
    5
}

fn default_max_depth() -> usize {
    5
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_subtasks: default_max_subtasks(),
            max_depth: default_max_depth(),
        }
    }
}

/// Text-handler settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TextConfig {
    /// Sentence budget for `summarize` when the request doesn't name one.
    /// Default: 3.
    #[serde(default = "default_summary_max_sentences")]
    pub summary_max_sentences: usize,
}

fn default_summary_max_sentences() -> usize {
    3
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            summary_max_sentences: default_summary_max_sentences(),
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file is not an error; defaults are returned so the
    /// daemon can start unconfigured.
    pub async fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let cfg: Config = serde_yaml_ng::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }
}
