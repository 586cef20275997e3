//! Configuration types and parsing for forgeup.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["forgeup.yml", "forgeup.yaml"];

const IN_MEMORY: &str = ":memory:";

/// Main project configuration from forgeup.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Bucket roots: directories walked recursively, or single files
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,

    /// Only keep buckets matching one of these patterns (empty = keep all)
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// Drop buckets matching any of these patterns
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Target database connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Where the run ledger is stored
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Resolve `.sql` files with no compiled migration as script buckets
    #[serde(default = "default_true")]
    pub sql_scripts: bool,
}

/// Target database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Ledger storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Separate DuckDB file for the ledger. When unset the ledger tables
    /// live in the target database.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_paths() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_db_path() -> String {
    IN_MEMORY.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for forgeup.yml or forgeup.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        if !dir.is_dir() {
            return Err(CoreError::ProjectNotFound {
                path: dir.display().to_string(),
            });
        }

        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
            .map_or_else(
                || {
                    Err(CoreError::ConfigNotFound {
                        path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                    })
                },
                |p| Self::load(&p),
            )
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if let Some(path) = &self.ledger.path {
            if path.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "ledger.path cannot be empty when set".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Bucket roots resolved against the project root
    pub fn paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.paths.iter().map(|p| root.join(p)).collect()
    }

    /// Target database path resolved against the project root.
    ///
    /// `:memory:` is returned unchanged.
    pub fn database_path(&self, root: &Path) -> String {
        resolve_db_path(root, &self.database.path)
    }

    /// Separate ledger path, if configured, resolved against the project root
    pub fn ledger_path(&self, root: &Path) -> Option<String> {
        self.ledger.path.as_deref().map(|p| resolve_db_path(root, p))
    }
}

fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == IN_MEMORY {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
