use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Direct download link of the roster workbook.
    pub sheet_url: String,
    pub cache_path: PathBuf,
    pub cache_max_age: Duration,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    /// Optional JSON file overriding the built-in target table.
    pub targets_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            sheet_url: std::env::var("SHEET_URL")
                .map_err(|_| anyhow::anyhow!("SHEET_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("SHEET_URL cannot be empty");
                    }
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("SHEET_URL must start with http:// or https://");
                    }
                    Ok(url)
                })?,
            cache_path: std::env::var("CACHE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "roster_cache.json".to_string())
                .into(),
            cache_max_age: secs_from_env("CACHE_MAX_AGE_SECS", 3600)?,
            refresh_interval: secs_from_env("REFRESH_INTERVAL_SECS", 900)?,
            request_timeout: secs_from_env("REQUEST_TIMEOUT_SECS", 30)?,
            targets_path: std::env::var("TARGETS_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Sheet URL: {}...",
            &config.sheet_url[..config.sheet_url.find('?').unwrap_or(config.sheet_url.len())]
        );
        tracing::debug!("Cache path: {}", config.cache_path.display());
        tracing::debug!(
            "Cache max age: {}s, refresh every {}s",
            config.cache_max_age.as_secs(),
            config.refresh_interval.as_secs()
        );
        if let Some(ref targets) = config.targets_path {
            tracing::info!("Target table override: {}", targets.display());
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Reads a positive number of seconds, falling back to `default`.
fn secs_from_env(name: &str, default: u64) -> anyhow::Result<Duration> {
    let secs = match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of seconds", name))?,
        _ => default,
    };
    if secs == 0 {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(Duration::from_secs(secs))
}
