use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub geo_base_url: String,
    pub geo_token: Option<String>,
    pub max_fetch_rows: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3434".to_string(),
            api_token: None,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "vinqr".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            geo_base_url: "https://ipinfo.io".to_string(),
            geo_token: None,
            max_fetch_rows: 10_000,
            max_body_bytes: 256 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("VINQR_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(user) = &self.clickhouse_user {
            if user.trim().is_empty() {
                self.clickhouse_user = None;
            }
        }
        if let Some(password) = &self.clickhouse_password {
            if password.trim().is_empty() {
                self.clickhouse_password = None;
            }
        }
        if let Some(token) = &self.geo_token {
            if token.trim().is_empty() {
                self.geo_token = None;
            }
        }
        self.geo_base_url = self.geo_base_url.trim().trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.geo_base_url.is_empty() {
            return Err(anyhow!("geo_base_url must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.max_fetch_rows == 0 {
            return Err(anyhow!("max_fetch_rows must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            geo_base_url: self.geo_base_url.clone(),
            geo_token: self.geo_token.clone(),
            max_fetch_rows: self.max_fetch_rows,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("VINQR_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("VINQR_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("VINQR_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("VINQR_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("VINQR_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("VINQR_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("VINQR_GEO_BASE_URL") {
            self.geo_base_url = value;
        }
        if let Ok(value) = env::var("VINQR_GEO_TOKEN") {
            self.geo_token = Some(value);
        }
        if let Ok(value) = env::var("VINQR_MAX_FETCH_ROWS") {
            self.max_fetch_rows = value.parse().unwrap_or(self.max_fetch_rows);
        }
        if let Ok(value) = env::var("VINQR_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("VINQR_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}
