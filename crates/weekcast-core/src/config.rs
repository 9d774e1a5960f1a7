use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (weekcast.toml + WEEKCAST_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekcastConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path.
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

/// The output channel the dispatch loop posts to.
///
/// The webhook URL is resolved once at startup; there is no per-send lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Webhook endpoint that accepts `{"content": "<text>"}` payloads.
    pub webhook_url: String,
}

#[derive(Debug, thiserror::Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(String);

impl WeekcastConfig {
    /// Load config: explicit path > `weekcast.toml` in the working directory.
    /// `WEEKCAST_*` env vars override file values (e.g. `WEEKCAST_DATABASE__PATH`).
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or("weekcast.toml");

        let config: WeekcastConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("WEEKCAST_").split("__"))
            .extract()
            .map_err(|e| ConfigError(e.to_string()))?;

        Ok(config)
    }
}

fn default_db_path() -> String {
    "weekcast.db".to_string()
}
