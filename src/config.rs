//! Configuration loading and types for the standby agent.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct.  Each subsection governs a different part of the
//! agent: node identity, HTTP listener, sync behavior, and logging.

use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Node identity and addresses.
    pub node: NodeConfig,

    /// Client-facing HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Cluster sync settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity of this node and where its data lives.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Logical node name, sent in join requests.
    pub name: String,

    /// URL scheme forced onto hinted peer addresses (`http` or `https`).
    #[serde(default = "default_peer_scheme")]
    pub peer_scheme: String,

    /// This node's replication-facing address.
    pub peer_url: String,

    /// This node's client-facing address.
    pub client_url: String,

    /// Directory holding the persisted topology snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Cluster sync configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Operator-supplied peer address hints tried after known members.
    #[serde(default)]
    pub peers: Vec<String>,

    /// Per-RPC timeout in seconds for peer requests.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            peers: Vec::new(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: text or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// -- Defaults ----------------------------------------------------------------

fn default_peer_scheme() -> String {
    "http".to_string()
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4001
}

fn default_request_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// -- Loader ------------------------------------------------------------------

/// Load and parse configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = serde_yaml::from_str(&contents)?;
    Ok(config)
}
