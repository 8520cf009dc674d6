use anyhow::Context;
use dotenv::dotenv;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Deserialize)]
pub struct EnvironmentVariables {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub front_base_url: Option<String>,
    pub otel_enabled: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub max_upload_bytes: usize,
    /// Origin allowed by the CORS layer, none disables the layer.
    pub front_base_url: Option<String>,
    pub otel_enabled: bool,
}

impl Config {
    pub fn new() -> Result<Self, anyhow::Error> {
        let _ = dotenv().map_err(|err| warn!("error loading .env: {:?}", err));

        let envs =
            envy::from_env::<EnvironmentVariables>().context("invalid environment variables")?;

        return Ok(Config::from_envs(envs));
    }

    pub fn from_envs(envs: EnvironmentVariables) -> Self {
        return Config {
            port: envs.port.unwrap_or(8000),
            host: envs.host.unwrap_or_else(|| "0.0.0.0".to_owned()),
            max_upload_bytes: envs.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            front_base_url: envs.front_base_url.filter(|url| !url.is_empty()),
            otel_enabled: envs.otel_enabled.unwrap_or(false),
        };
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
