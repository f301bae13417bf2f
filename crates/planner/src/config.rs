/// Runtime configuration for the planner server
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "config.json";
const LOCAL_CONFIG_FILE: &str = "config.local.json";

/// Connection and runtime parameters.
///
/// Loaded once by the binary and passed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file, or `:memory:` for a throwaway store
    pub db_path: String,
    pub address: String,
    pub port: u16,
    /// Custom archetype catalog (JSON); the built-in one is used when unset
    pub catalog_path: Option<PathBuf>,
    /// `tracing` filter directive, e.g. "planner=debug"
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "planner.db".to_string(),
            address: "127.0.0.1".to_string(),
            port: 2727,
            catalog_path: None,
            log_filter: None,
        }
    }
}

impl Config {
    /// Loads `config.json` from `config_dir`, overlaid key by key with
    /// `config.local.json` when that file exists.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding the config files
    ///
    /// # Returns
    /// * `Ok(Config)` - Merged configuration (defaults if neither file exists)
    /// * `Err` - If a file can't be read or parsed
    pub fn load_from_directory(config_dir: &Path) -> Result<Self> {
        let mut merged = read_object(&config_dir.join(DEFAULT_CONFIG_FILE))?.unwrap_or_default();

        if let Some(local) = read_object(&config_dir.join(LOCAL_CONFIG_FILE))? {
            info!("Applying {} overrides from {}", local.len(), LOCAL_CONFIG_FILE);
            for (key, value) in local {
                merged.insert(key, value);
            }
        }

        serde_json::from_value(Value::Object(merged))
            .map_err(|e| Error::configuration(format!("invalid configuration: {e}")))
    }

    /// `address:port` for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Reads a JSON object from `path`, or `None` if the file doesn't exist.
fn read_object(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(Error::configuration(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(Error::configuration(format!(
            "failed to parse {}: {e}",
            path.display()
        ))),
    }
}
