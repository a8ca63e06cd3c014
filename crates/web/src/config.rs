use anyhow::{Context, Result};
use lifecycle::services::ReconcilerConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub reconcile_interval_secs: u64,
    pub reconcile_max_concurrent: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            reconcile_interval_secs: optional_var("RECONCILE_INTERVAL_SECS", 60)?,
            reconcile_max_concurrent: optional_var("RECONCILE_MAX_CONCURRENT", 8)?,
        })
    }

    pub fn reconciler(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            interval: Duration::from_secs(self.reconcile_interval_secs.max(1)),
            max_concurrent: self.reconcile_max_concurrent.max(1),
        }
    }
}

fn optional_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be a number")),
        Err(_) => Ok(default),
    }
}
