//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::Context;
use exchange_rates::DEFAULT_TREASURY_BASE_URL;
use transactions_repo::MEMORY_URL;

/// Where exchange rates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Treasury,
    Fixed,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rate_source: RateSource,
    pub treasury_base_url: String,
    pub treasury_timeout: Duration,
    pub retention_days: Option<u32>,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port: u16 = var("PORT")
            .map(|v| v.parse().with_context(|| format!("Invalid PORT: {}", v)))
            .transpose()?
            .unwrap_or(8080);

        let database_url = var("DATABASE_URL").unwrap_or_else(|| MEMORY_URL.to_string());

        let rate_source = match var("EXCHANGE_RATE_SOURCE")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("treasury") => RateSource::Treasury,
            Some("fixed") => RateSource::Fixed,
            Some(other) => anyhow::bail!(
                "Invalid EXCHANGE_RATE_SOURCE: {} (expected `treasury` or `fixed`)",
                other
            ),
        };

        let treasury_base_url =
            var("TREASURY_API_BASE_URL").unwrap_or_else(|| DEFAULT_TREASURY_BASE_URL.to_string());

        let timeout_secs: u64 = var("TREASURY_API_TIMEOUT_SECS")
            .map(|v| {
                v.parse()
                    .with_context(|| format!("Invalid TREASURY_API_TIMEOUT_SECS: {}", v))
            })
            .transpose()?
            .unwrap_or(5);
        if timeout_secs == 0 {
            anyhow::bail!("TREASURY_API_TIMEOUT_SECS must be at least 1");
        }

        let retention_days: Option<u32> = var("TRANSACTION_RETENTION_DAYS")
            .map(|v| {
                v.parse()
                    .with_context(|| format!("Invalid TRANSACTION_RETENTION_DAYS: {}", v))
            })
            .transpose()?;

        let log_format = match var("LOG_FORMAT").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!(
                "Invalid LOG_FORMAT: {} (expected `text` or `json`)",
                other
            ),
        };

        Ok(Self {
            port,
            database_url,
            rate_source,
            treasury_base_url,
            treasury_timeout: Duration::from_secs(timeout_secs),
            retention_days,
            log_format,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}
