//! SynfulCircuit configuration file handling
//!
//! Loads and manages the ~/.config/synful/config.yaml file.

use crate::cache::DEFAULT_TABLE;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Backing store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite link database
    pub path: PathBuf,

    /// Name of the link table
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("synful.db"),
            table: default_table(),
        }
    }
}

/// Row filters applied once when links are fetched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum synapse score to keep a link; 0 or negative disables the filter
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Drop links whose pre and post segment are the same
    #[serde(default = "default_filter_autapses")]
    pub filter_autapses: bool,
}

fn default_score_threshold() -> f64 {
    60.0
}

fn default_filter_autapses() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            filter_autapses: default_filter_autapses(),
        }
    }
}

/// Defaults for partner queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum number of partners returned
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum edge weight for a partner to count
    #[serde(default)]
    pub weight_threshold: u32,
}

fn default_top_k() -> usize {
    5
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            weight_threshold: 0,
        }
    }
}

/// SynfulCircuit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub filters: FilterConfig,

    #[serde(default)]
    pub queries: QueryConfig,
}

impl CircuitConfig {
    /// Create a configuration for the database at `path` with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig {
                path: path.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Load configuration from the default path (~/.config/synful/config.yaml)
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::SynfulError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            store = %config.store.path.display(),
            table = %config.store.table,
            score_threshold = config.filters.score_threshold,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/synful/config.yaml)
    pub fn default_path() -> PathBuf {
        // Always use ~/.config for consistency across platforms (macOS, Linux)
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("synful");
        path.push("config.yaml");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = CircuitConfig::new("/data/links.db");
        assert_eq!(config.store.path, PathBuf::from("/data/links.db"));
        assert_eq!(config.store.table, "synlinks");
        assert_eq!(config.filters.score_threshold, 60.0);
        assert!(config.filters.filter_autapses);
        assert_eq!(config.queries.top_k, 5);
        assert_eq!(config.queries.weight_threshold, 0);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");

        let mut config = CircuitConfig::new("links.db");
        config.filters.score_threshold = 0.0;
        config.queries.top_k = 10;
        config.save(&path).unwrap();

        let loaded = CircuitConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
store:
  path: /data/fib25.db
filters:
  filter_autapses: false
"#;
        let config: CircuitConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.store.table, "synlinks");
        assert!(!config.filters.filter_autapses);
        assert_eq!(config.filters.score_threshold, 60.0);
        assert_eq!(config.queries.top_k, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = CircuitConfig::load(temp_dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(crate::SynfulError::Config(_))));
    }

    #[test]
    fn test_default_path() {
        assert!(CircuitConfig::default_path().ends_with(".config/synful/config.yaml"));
    }
}
