use std::time::Duration;

use clap::Args;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Largest request body the service accepts
pub const DEFAULT_PAYLOAD_LIMIT: usize = 256 * 1024;

/// HTTP service settings; every flag can also come from the environment
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "WEEKPLAN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "WEEKPLAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum request body size in bytes
    #[arg(long, env = "WEEKPLAN_PAYLOAD_LIMIT", default_value_t = DEFAULT_PAYLOAD_LIMIT)]
    pub payload_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
        }
    }
}

/// Remote engine settings for the CLI client
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// URL of a remote schedule endpoint; generation runs locally when unset
    /// or when the remote call fails
    #[arg(long = "remote", env = "WEEKPLAN_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Timeout for the remote call in seconds
    #[arg(long, env = "WEEKPLAN_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            remote_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
