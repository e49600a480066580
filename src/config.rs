//! Environment-driven service configuration

use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Longest a transaction may wait for a pooled connection.
    pub tx_max_wait: Duration,
    /// Ceiling on a whole product replacement transaction.
    pub tx_timeout: Duration,
    pub nats_url: Option<String>,
    pub revalidate_subject: String,
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8083,
            database_url: None,
            max_connections: 10,
            tx_max_wait: Duration::from_millis(10_000),
            tx_timeout: Duration::from_millis(20_000),
            nats_url: None,
            revalidate_subject: "storefront.revalidate".to_string(),
            seed_demo_data: false,
        }
    }
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(v) => v.parse().with_context(|| format!("PORT must be a port number, got {v:?}"))?,
            None => defaults.port,
        };
        let max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().with_context(|| format!("DATABASE_MAX_CONNECTIONS must be an integer, got {v:?}"))?,
            None => defaults.max_connections,
        };
        let millis = |key: &str, fallback: Duration| -> Result<Duration> {
            match non_empty(key) {
                Some(v) => Ok(Duration::from_millis(v.parse().with_context(|| format!("{key} must be milliseconds, got {v:?}"))?)),
                None => Ok(fallback),
            }
        };
        let seed_demo_data = match non_empty("SEED_DEMO_DATA") {
            Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            None => defaults.seed_demo_data,
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            max_connections,
            tx_max_wait: millis("TX_MAX_WAIT_MS", defaults.tx_max_wait)?,
            tx_timeout: millis("TX_TIMEOUT_MS", defaults.tx_timeout)?,
            nats_url: non_empty("NATS_URL"),
            revalidate_subject: non_empty("REVALIDATE_SUBJECT").unwrap_or(defaults.revalidate_subject),
            seed_demo_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.port, 8083);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.tx_timeout, Duration::from_secs(20));
        assert_eq!(cfg.revalidate_subject, "storefront.revalidate");
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let cfg = Config::from_lookup(lookup(&[("PORT", "9000"), ("DATABASE_URL", " "), ("TX_MAX_WAIT_MS", "250"), ("SEED_DEMO_DATA", "true")])).unwrap();
        assert_eq!(cfg.port, 9000);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.tx_max_wait, Duration::from_millis(250));
        assert!(cfg.seed_demo_data);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TX_TIMEOUT_MS", "-5")])).is_err());
    }
}
