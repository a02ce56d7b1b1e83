//! Engine configuration
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file, then
//! `KANBAN_BOARD_*` environment variables (`__` separates nested keys, so
//! `KANBAN_BOARD_STORAGE__LATENCY_MS=400` sets `storage.latency_ms`).

use crate::sample::{ColumnSeed, ColumnTemplate, RandomTemplate, SampleCardFactory, SampleData};
use crate::store::{FileStore, LatencyStore, MemoryStore, StateStore};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KANBAN_BOARD_";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    Parse {
        #[from]
        source: figment::Error,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Where board state is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// The single store key all board state lives under
    pub key: String,
    /// File-backed store root; in-memory when unset
    pub directory: Option<PathBuf>,
    /// Artificial delay added to every store call
    pub latency_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: "BOARD_DATA".to_string(),
            directory: None,
            latency_ms: 0,
        }
    }
}

impl StorageConfig {
    /// Build the configured store
    pub fn build_store(&self) -> Arc<dyn StateStore> {
        let store: Arc<dyn StateStore> = match &self.directory {
            Some(directory) => Arc::new(FileStore::new(directory)),
            None => Arc::new(MemoryStore::new()),
        };

        if self.latency_ms == 0 {
            store
        } else {
            Arc::new(LatencyStore::new(store, Duration::from_millis(self.latency_ms)))
        }
    }
}

/// Default board layout and the sample data used to fill it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Columns of a freshly generated board, in display order
    pub columns: Vec<ColumnSeed>,
    /// Pool `add column` draws from
    pub templates: Vec<ColumnTemplate>,
    /// Sample cards placed in an added column
    pub added_column_cards: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                ColumnSeed::new("NOT_STARTED", "NOT STARTED", 10),
                ColumnSeed::new("IN_PROGRESS", "IN PROGRESS", 10),
                ColumnSeed::new("UNDER_REVIEW", "UNDER REVIEW", 2),
                ColumnSeed::new("SHIPPED", "SHIPPED", 10),
            ],
            templates: vec![ColumnTemplate::new("PR_REVIEW", "PR REVIEW")],
            added_column_cards: 10,
        }
    }
}

impl DefaultsConfig {
    /// Randomized sample data drawing from the configured pool
    pub fn sample_data(&self) -> SampleData {
        SampleData::new(
            SampleCardFactory::new(),
            RandomTemplate::new(),
            self.templates.clone(),
            self.added_column_cards,
        )
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub storage: StorageConfig,
    pub defaults: DefaultsConfig,
}

impl BoardConfig {
    /// Load from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.key.is_empty() {
            return Err(ConfigError::validation("storage.key must not be empty"));
        }
        if self.defaults.columns.is_empty() {
            return Err(ConfigError::validation("defaults.columns must not be empty"));
        }

        let mut seen = HashSet::new();
        for seed in &self.defaults.columns {
            if !seen.insert(&seed.template.column_id) {
                return Err(ConfigError::validation(format!(
                    "duplicate default column id: {}",
                    seed.template.column_id
                )));
            }
        }

        let mut seen = HashSet::new();
        for template in &self.defaults.templates {
            if !seen.insert(&template.column_id) {
                return Err(ConfigError::validation(format!(
                    "duplicate column template id: {}",
                    template.column_id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults() {
        let config = BoardConfig::load(None).unwrap();

        assert_eq!(config.storage.key, "BOARD_DATA");
        assert_eq!(config.storage.latency_ms, 0);
        let counts: Vec<_> = config.defaults.columns.iter().map(|c| c.cards).collect();
        assert_eq!(counts, vec![10, 10, 2, 10]);
        assert_eq!(config.defaults.templates[0].title, "PR REVIEW");
    }

    #[test]
    #[serial]
    fn test_toml_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.toml");
        fs::write(
            &path,
            r#"
[storage]
key = "TEAM_BOARD"
latency_ms = 400

[[defaults.columns]]
column_id = "TODO"
title = "TODO"
cards = 3

[[defaults.columns]]
column_id = "DONE"
title = "DONE"
cards = 0
"#,
        )
        .unwrap();

        let config = BoardConfig::load(Some(&path)).unwrap();

        assert_eq!(config.storage.key, "TEAM_BOARD");
        assert_eq!(config.storage.latency_ms, 400);
        assert_eq!(config.defaults.columns.len(), 2);
        assert_eq!(config.defaults.columns[0], ColumnSeed::new("TODO", "TODO", 3));
        // untouched sections keep their defaults
        assert_eq!(config.defaults.added_column_cards, 10);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.toml");
        fs::write(&path, "[storage]\nkey = \"FROM_FILE\"\n").unwrap();

        std::env::set_var("KANBAN_BOARD_STORAGE__KEY", "FROM_ENV");
        std::env::set_var("KANBAN_BOARD_DEFAULTS__ADDED_COLUMN_CARDS", "4");
        let config = BoardConfig::load(Some(&path));
        std::env::remove_var("KANBAN_BOARD_STORAGE__KEY");
        std::env::remove_var("KANBAN_BOARD_DEFAULTS__ADDED_COLUMN_CARDS");

        let config = config.unwrap();
        assert_eq!(config.storage.key, "FROM_ENV");
        assert_eq!(config.defaults.added_column_cards, 4);
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        let result = BoardConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty() {
        let mut config = BoardConfig::default();
        config.defaults.columns.push(ColumnSeed::new("SHIPPED", "AGAIN", 1));
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        let mut config = BoardConfig::default();
        config.defaults.columns.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("defaults.columns"));

        let mut config = BoardConfig::default();
        config.defaults.templates.push(ColumnTemplate::new("PR_REVIEW", "PR"));
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_build_store() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig {
            directory: Some(temp.path().to_path_buf()),
            latency_ms: 1,
            ..StorageConfig::default()
        };

        let store = storage.build_store();
        store.set("BOARD_DATA", serde_json::json!({"k": 1})).await.unwrap();
        assert!(temp.path().join("BOARD_DATA.json").exists());
    }
}
