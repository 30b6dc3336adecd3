//! Daemon configuration from `CLAIMQ_*` environment variables

use claimq_core::domain::UserId;
use claimq_core::error::{AppError, Result};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "~/.claimq/claims.db";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9531;
const DEFAULT_QUEUE_TTL_SECS: u64 = 86_400;
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3_600;

/// Where transients and assignments live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WooCommerceSettings {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub storage: StorageConfig,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub queue_ttl: Duration,
    pub purge_interval: Duration,
    pub nonce: Option<String>,
    pub allowed_users: Option<HashSet<UserId>>,
    /// `None` falls back to the local creator
    pub woocommerce: Option<WooCommerceSettings>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match get("CLAIMQ_DB_PATH") {
            Some(path) if path == "memory" => StorageConfig::Memory,
            Some(path) => StorageConfig::Sqlite(shellexpand::tilde(&path).into_owned()),
            None => StorageConfig::Sqlite(shellexpand::tilde(DEFAULT_DB_PATH).into_owned()),
        };

        let woocommerce = match (
            get("CLAIMQ_WC_BASE_URL"),
            get("CLAIMQ_WC_CONSUMER_KEY"),
            get("CLAIMQ_WC_CONSUMER_SECRET"),
        ) {
            (Some(base_url), Some(consumer_key), Some(consumer_secret)) => {
                Some(WooCommerceSettings {
                    base_url,
                    consumer_key,
                    consumer_secret,
                })
            }
            _ => None,
        };

        let allowed_users = get("CLAIMQ_ALLOWED_USERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| parse_value::<u64>("CLAIMQ_ALLOWED_USERS", s).map(UserId::new))
                    .collect::<Result<HashSet<_>>>()
            })
            .transpose()?;

        let purge_interval_secs = parse_or(
            "CLAIMQ_PURGE_INTERVAL_SECS",
            get("CLAIMQ_PURGE_INTERVAL_SECS"),
            DEFAULT_PURGE_INTERVAL_SECS,
        )?;
        if purge_interval_secs == 0 {
            return Err(AppError::Config(
                "CLAIMQ_PURGE_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            storage,
            rpc_host: get("CLAIMQ_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            rpc_port: parse_or("CLAIMQ_RPC_PORT", get("CLAIMQ_RPC_PORT"), DEFAULT_RPC_PORT)?,
            queue_ttl: Duration::from_secs(parse_or(
                "CLAIMQ_QUEUE_TTL_SECS",
                get("CLAIMQ_QUEUE_TTL_SECS"),
                DEFAULT_QUEUE_TTL_SECS,
            )?),
            purge_interval: Duration::from_secs(purge_interval_secs),
            nonce: get("CLAIMQ_NONCE"),
            allowed_users,
            woocommerce,
        })
    }

    /// Queue TTL in milliseconds, as the queue store wants it
    pub fn queue_ttl_ms(&self) -> i64 {
        i64::try_from(self.queue_ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw}")))
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<DaemonConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert!(matches!(cfg.storage, StorageConfig::Sqlite(ref p) if p.ends_with(".claimq/claims.db")));
        assert_eq!(cfg.rpc_host, "127.0.0.1");
        assert_eq!(cfg.rpc_port, 9531);
        assert_eq!(cfg.queue_ttl_ms(), 86_400_000);
        assert_eq!(cfg.purge_interval, Duration::from_secs(3_600));
        assert!(cfg.nonce.is_none());
        assert!(cfg.allowed_users.is_none());
        assert!(cfg.woocommerce.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("CLAIMQ_DB_PATH", "memory"),
            ("CLAIMQ_RPC_PORT", "7000"),
            ("CLAIMQ_QUEUE_TTL_SECS", "60"),
            ("CLAIMQ_NONCE", "abc"),
            ("CLAIMQ_ALLOWED_USERS", "1, 2,,3"),
        ])
        .unwrap();

        assert_eq!(cfg.storage, StorageConfig::Memory);
        assert_eq!(cfg.rpc_port, 7000);
        assert_eq!(cfg.queue_ttl_ms(), 60_000);
        assert_eq!(cfg.nonce.as_deref(), Some("abc"));

        let users = cfg.allowed_users.unwrap();
        assert_eq!(users.len(), 3);
        assert!(users.contains(&UserId::new(2)));
    }

    #[test]
    fn test_woocommerce_needs_all_three() {
        let partial = config(&[
            ("CLAIMQ_WC_BASE_URL", "https://shop.test"),
            ("CLAIMQ_WC_CONSUMER_KEY", "ck"),
        ])
        .unwrap();
        assert!(partial.woocommerce.is_none());

        let full = config(&[
            ("CLAIMQ_WC_BASE_URL", "https://shop.test"),
            ("CLAIMQ_WC_CONSUMER_KEY", "ck"),
            ("CLAIMQ_WC_CONSUMER_SECRET", "cs"),
        ])
        .unwrap();
        assert_eq!(full.woocommerce.unwrap().consumer_secret, "cs");
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        let err = config(&[("CLAIMQ_RPC_PORT", "lots")]).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("CLAIMQ_RPC_PORT")));

        let err = config(&[("CLAIMQ_ALLOWED_USERS", "1,x")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = config(&[("CLAIMQ_PURGE_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
