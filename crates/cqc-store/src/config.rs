//! Store configuration
//!
//! Loaded from TOML, from `CQC_*` environment variables (with an optional
//! `.env` file), or built in code.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{config_error, io_error, Result};

/// Path value that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

pub const ENV_DATABASE_PATH: &str = "CQC_DATABASE_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "CQC_BUSY_TIMEOUT_MS";
pub const ENV_JOURNAL_MODE: &str = "CQC_JOURNAL_MODE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    #[default]
    Wal,
    Delete,
    Memory,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
            JournalMode::Memory => "MEMORY",
        }
    }
}

impl FromStr for JournalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wal" => Ok(JournalMode::Wal),
            "delete" => Ok(JournalMode::Delete),
            "memory" => Ok(JournalMode::Memory),
            other => Err(format!("unknown journal mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub journal_mode: JournalMode,
    /// Bring the schema up to date when the store is opened
    pub apply_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cqc.db"),
            busy_timeout_ms: 5_000,
            journal_mode: JournalMode::Wal,
            apply_migrations: true,
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(IN_MEMORY),
            journal_mode: JournalMode::Memory,
            ..Self::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// # Errors
    ///
    /// `InvalidInput` if the text is not valid TOML for this struct.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("invalid store config: {}", e)))
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| io_error("config_read", e))?;
        Self::from_toml_str(&content)
    }

    /// Load from the process environment after reading an optional `.env`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed `.env` file or unparseable values.
    pub fn from_env() -> Result<Self> {
        env_file_loaded(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    ///
    /// # Errors
    ///
    /// `InvalidInput` for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = raw.parse().map_err(|_| {
                config_error(format!("{} must be an integer, got {:?}", ENV_BUSY_TIMEOUT_MS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_JOURNAL_MODE) {
            config.journal_mode = raw.parse().map_err(config_error)?;
        }
        if config.is_in_memory() {
            config.journal_mode = JournalMode::Memory;
        }

        Ok(config)
    }
}

// a missing .env file is fine, an unreadable or malformed one is not
fn env_file_loaded<T>(result: dotenvy::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(config_error(format!("invalid .env file: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqc_core::errors::ExErrorKind;
    use std::collections::HashMap;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
            database_path = "/var/lib/cqc/cqc.db"
            journal_mode = "delete"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/cqc/cqc.db"));
        assert_eq!(config.journal_mode, JournalMode::Delete);
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert!(config.apply_migrations);
    }

    #[test]
    fn test_toml_rejects_unknown_journal_mode() {
        let err = StoreConfig::from_toml_str("journal_mode = \"sideways\"").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATABASE_PATH, IN_MEMORY),
            (ENV_BUSY_TIMEOUT_MS, "250"),
        ]
        .into_iter()
        .collect();

        let config = StoreConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert!(config.is_in_memory());
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
        assert_eq!(config.journal_mode, JournalMode::Memory);
    }

    #[test]
    fn test_lookup_rejects_bad_timeout() {
        let err = StoreConfig::from_lookup(|k| {
            (k == ENV_BUSY_TIMEOUT_MS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(err.message().contains(ENV_BUSY_TIMEOUT_MS));
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();

        let result = env_file_loaded(dotenvy::from_path(dir.path().join(".env")));

        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        // Given: A .env file with a line that is not an assignment
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "not an assignment\n").unwrap();

        // When: It is loaded
        let err = env_file_loaded(dotenvy::from_path(&path)).unwrap_err();

        // Then: The parse failure surfaces as a config error
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert_eq!(err.op(), Some("config"));
        assert!(err.message().contains("invalid .env file"));
    }
}
