//! Runtime configuration.
//!
//! Everything has a sensible default; environment variables override:
//! - `SITEBOOK_DB` - database file. Defaults to `sitebook.db` in the platform data dir.
//! - `SITEBOOK_EXPORT_DIR` - where spreadsheet exports go. Defaults to the home dir.
//! - `SITEBOOK_CURRENCY` - currency label used in reports. Defaults to `PKR`.
//! - `SITEBOOK_LOG` - tracing filter directive. Defaults to `sitebook=info`.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub(crate) const DEFAULT_CURRENCY: &str = "PKR";
pub(crate) const DEFAULT_LOG_FILTER: &str = "sitebook=info";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) export_dir: PathBuf,
    pub(crate) currency: String,
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source so tests need not touch the process env.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = directories::ProjectDirs::from("com", "sitebook", "SiteBook")
            .map(|d| d.data_dir().to_path_buf())
            .ok_or(ConfigError::NoDataDir)?;

        let db_path = non_empty("SITEBOOK_DB")
            .map(|p| PathBuf::from(expand_home(&p)))
            .unwrap_or_else(|| data_dir.join("sitebook.db"));

        let export_dir = non_empty("SITEBOOK_EXPORT_DIR")
            .map(|p| PathBuf::from(expand_home(&p)))
            .unwrap_or_else(home_dir);
        if export_dir.is_file() {
            return Err(ConfigError::InvalidValue(
                "SITEBOOK_EXPORT_DIR".into(),
                format!("{} is a file", export_dir.display()),
            ));
        }

        let currency = non_empty("SITEBOOK_CURRENCY")
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if currency.len() > 8 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue(
                "SITEBOOK_CURRENCY".into(),
                format!("'{currency}' is not a currency code"),
            ));
        }

        let log_filter =
            non_empty("SITEBOOK_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            db_path,
            export_dir,
            currency,
            log_filter,
        })
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join("sitebook.log")
    }

    /// Create the directories the database and log live in.
    pub(crate) fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

fn home_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~/` to the user's home directory.
pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest).display().to_string()
    } else {
        path.to_string()
    }
}

pub(crate) fn is_dir_like(path: &Path) -> bool {
    path.is_dir() || path.to_string_lossy().ends_with('/')
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.currency, "PKR");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.db_path.ends_with("sitebook.db"));
        assert!(config.log_path().ends_with("sitebook.log"));
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("site.db");
        let config = config_with(&[
            ("SITEBOOK_DB", db.to_str().unwrap()),
            ("SITEBOOK_EXPORT_DIR", dir.path().to_str().unwrap()),
            ("SITEBOOK_CURRENCY", " usd "),
            ("SITEBOOK_LOG", "sitebook=debug"),
        ])
        .unwrap();
        assert_eq!(config.db_path, db);
        assert_eq!(config.export_dir, dir.path());
        assert_eq!(config.currency, "USD");
        assert_eq!(config.log_filter, "sitebook=debug");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_with(&[("SITEBOOK_CURRENCY", "  ")]).unwrap();
        assert_eq!(config.currency, "PKR");
    }

    #[test]
    fn test_invalid_currency() {
        let err = config_with(&[("SITEBOOK_CURRENCY", "rs.")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "SITEBOOK_CURRENCY"));
    }

    #[test]
    fn test_export_dir_must_not_be_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = config_with(&[("SITEBOOK_EXPORT_DIR", file.path().to_str().unwrap())])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(..)));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/x.csv"), "/tmp/x.csv");
        assert!(!expand_home("~/x.csv").starts_with('~'));
    }
}
