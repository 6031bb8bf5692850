//! # Application Configuration
//!
//! Settings resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`, `--id-policy`, `--currency`)
//! 2. Environment variables (`SHOPKEEP_*`)
//! 3. Defaults (this file)

use std::path::PathBuf;

use directories::ProjectDirs;
use shopkeep_core::{IdPolicy, Money};

use crate::error::CliError;

pub const ENV_DB_PATH: &str = "SHOPKEEP_DB_PATH";
pub const ENV_CURRENCY: &str = "SHOPKEEP_CURRENCY";
pub const ENV_ID_POLICY: &str = "SHOPKEEP_ID_POLICY";

/// Resolved configuration for one `shopkeep` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Database file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Prefix shown before amounts, e.g. "EG 30.00"
    pub currency_symbol: String,

    /// What deleting an item does to the other ids
    pub id_policy: IdPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: None,
            currency_symbol: "EG ".to_string(),
            id_policy: IdPolicy::Renumber,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `SHOPKEEP_*` environment variables.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup(ENV_CURRENCY) {
            config.currency_symbol = symbol;
        }

        if let Some(policy) = lookup(ENV_ID_POLICY) {
            config.id_policy = policy.parse()?;
        }

        Ok(config)
    }

    /// Applies command-line flags on top of the current values.
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        id_policy: Option<IdPolicy>,
        currency: Option<String>,
    ) -> Self {
        if let Some(path) = db_path {
            self.db_path = Some(path);
        }
        if let Some(policy) = id_policy {
            self.id_policy = policy;
        }
        if let Some(symbol) = currency {
            self.currency_symbol = symbol;
        }
        self
    }

    /// The database file to open, creating the data directory if needed.
    pub fn database_path(&self) -> Result<PathBuf, CliError> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "shopkeep", "shopkeep")
            .ok_or_else(|| CliError::internal("Could not determine a data directory"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("store.db"))
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "EG 12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.major().abs(),
            amount.minor()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "EG 12.34");
        assert_eq!(config.format_currency(Money::from_cents(100)), "EG 1.00");
        assert_eq!(config.format_currency(Money::from_cents(1)), "EG 0.01");
        assert_eq!(config.format_currency(Money::zero()), "EG 0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-EG 12.34");
        assert_eq!(config.format_currency(Money::from_cents(-5)), "-EG 0.05");
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/shop.db"),
            (ENV_CURRENCY, "$"),
            (ENV_ID_POLICY, "stable"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.id_policy, IdPolicy::Stable);
    }

    #[test]
    fn test_bad_policy_in_env_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_ID_POLICY, "shuffle")])).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_flags_win_over_env() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_DB_PATH, "/tmp/env.db")]))
            .unwrap()
            .with_overrides(Some(PathBuf::from("/tmp/flag.db")), None, None);

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/flag.db")));
        assert_eq!(config.id_policy, IdPolicy::Renumber);
        assert_eq!(config.currency_symbol, "EG ");
    }

    #[test]
    fn test_explicit_path_is_used_as_is() {
        let config = AppConfig::default().with_overrides(Some(PathBuf::from("x.db")), None, None);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("x.db"));
    }
}
