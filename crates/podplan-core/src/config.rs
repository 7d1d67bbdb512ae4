use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 5010;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Top-level config (podplan.toml + PODPLAN_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodplanConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path every route and redirect is mounted under, e.g. "/podcasts".
    /// Empty mounts at the root.
    #[serde(default)]
    pub prefix: String,
    /// Attach a permissive CORS layer (default: true).
    #[serde(default = "bool_true")]
    pub cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            prefix: String::new(),
            cors: true,
        }
    }
}

impl GatewayConfig {
    /// `prefix` normalised to either "" or "/segment" without a trailing slash.
    pub fn mount_path(&self) -> String {
        let trimmed = self.prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.podplan/podplan.db", home)
}

impl PodplanConfig {
    /// Load config from a TOML file with PODPLAN_* env var overrides.
    ///
    /// The file is optional: a missing file yields the defaults, still
    /// subject to env overrides.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(path = %path, "loading configuration");

        Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("PODPLAN_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.podplan/podplan.toml", home)
}
