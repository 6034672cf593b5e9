// Configuration module for ormgraph
// Reads from environment variables with sensible defaults

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

pub const DEFAULT_MODEL_DIRS: &[&str] = &["app/Models", "app"];
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["vendor", "node_modules", "storage"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Repo-relative directories holding model classes (ORMGRAPH_MODEL_DIRS)
    pub model_dirs: Vec<String>,

    /// Directory names pruned anywhere in the tree (ORMGRAPH_EXCLUDE_DIRS)
    pub exclude_dirs: Vec<String>,

    /// Files above this size are not scanned (ORMGRAPH_MAX_FILE_BYTES)
    pub max_file_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dirs: DEFAULT_MODEL_DIRS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_file_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(val) = lookup("ORMGRAPH_MODEL_DIRS") {
            let dirs = split_list(&val);
            if dirs.is_empty() {
                tracing::warn!(
                    "Invalid ORMGRAPH_MODEL_DIRS value: {:?}, using default: {:?}",
                    val,
                    config.model_dirs
                );
            } else {
                config.model_dirs = dirs;
            }
        }

        if let Some(val) = lookup("ORMGRAPH_EXCLUDE_DIRS") {
            config.exclude_dirs = split_list(&val);
        }

        if let Some(val) = lookup("ORMGRAPH_MAX_FILE_BYTES") {
            if let Ok(parsed) = val.trim().parse() {
                config.max_file_bytes = parsed;
            } else {
                tracing::warn!(
                    "Invalid ORMGRAPH_MAX_FILE_BYTES value: {}, using default: {}",
                    val,
                    config.max_file_bytes
                );
            }
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().trim_matches('/').to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
