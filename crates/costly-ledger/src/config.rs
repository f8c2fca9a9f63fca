//! Ledger configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use costly_core::StockPolicy;
use costly_db::DbConfig;

/// Runtime configuration of a ledger process.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Floor applied when sales consume stock
    pub stock_policy: StockPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            database_path: PathBuf::from("./costly.db"),
            max_connections: 5,
            stock_policy: StockPolicy::AllowNegative,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                 | Default          |
    /// |--------------------------|------------------|
    /// | `COSTLY_DATABASE_PATH`   | `./costly.db`    |
    /// | `COSTLY_MAX_CONNECTIONS` | `5`              |
    /// | `COSTLY_STOCK_POLICY`    | `allow-negative` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = LedgerConfig {
            database_path: lookup("COSTLY_DATABASE_PATH")
                .unwrap_or_else(|| "./costly.db".to_string())
                .into(),

            max_connections: lookup("COSTLY_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("COSTLY_MAX_CONNECTIONS".to_string()))?,

            stock_policy: lookup("COSTLY_STOCK_POLICY")
                .unwrap_or_else(|| "allow-negative".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("COSTLY_STOCK_POLICY".to_string()))?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "COSTLY_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./costly.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.stock_policy, StockPolicy::AllowNegative);
    }

    #[test]
    fn test_overrides() {
        let config = LedgerConfig::from_lookup(lookup(&[
            ("COSTLY_DATABASE_PATH", "/tmp/ledger.db"),
            ("COSTLY_MAX_CONNECTIONS", "8"),
            ("COSTLY_STOCK_POLICY", "reject-negative"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.db_config().max_connections, 8);
        assert_eq!(config.stock_policy, StockPolicy::RejectNegative);
    }

    #[test]
    fn test_invalid_values() {
        let err = LedgerConfig::from_lookup(lookup(&[("COSTLY_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for COSTLY_MAX_CONNECTIONS");

        assert!(LedgerConfig::from_lookup(lookup(&[("COSTLY_MAX_CONNECTIONS", "0")])).is_err());
        assert!(LedgerConfig::from_lookup(lookup(&[("COSTLY_STOCK_POLICY", "sometimes")])).is_err());
    }
}
