//! Shared configuration for go-gen.
//!
//! The effective configuration is layered: built-in defaults, then the global
//! `~/.apirc.json`, then the project-local `./.apirc.json`. Later layers only
//! override the keys they actually set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config filename used both globally and per project.
pub const CONFIG_FILENAME: &str = ".apirc.json";

/// Default module the generated `api.ts` imports `request` from.
pub const DEFAULT_REQUEST_MODULE: &str = "@/utils/request";

/// Errors raised while reading or writing config files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where generated files go when the user is not asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLocation {
    Current,
    Desktop,
    Ask,
}

impl OutputLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputLocation::Current => "current",
            OutputLocation::Desktop => "desktop",
            OutputLocation::Ask => "ask",
        }
    }
}

/// Effective go-gen configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub default_output_path: OutputLocation,
    /// Request timeout in milliseconds.
    pub timeout: u64,
    pub auto_retry: bool,
    pub max_retries: u32,
    pub request_module: String,
    pub type_prefix: String,
    pub api_prefix: String,
    pub default_method: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_output_path: OutputLocation::Current,
            timeout: 10_000,
            auto_retry: true,
            max_retries: 3,
            request_module: DEFAULT_REQUEST_MODULE.to_string(),
            type_prefix: String::new(),
            api_prefix: String::new(),
            default_method: "GET".to_string(),
        }
    }
}

/// Keys written by `go-gen init` into a fresh project config.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub request_module: String,
    pub type_prefix: String,
    pub api_prefix: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            request_module: DEFAULT_REQUEST_MODULE.to_string(),
            type_prefix: String::new(),
            api_prefix: String::new(),
        }
    }
}

/// Get the global config path (~/.apirc.json).
pub fn global_config_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILENAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Get the project config path inside `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

/// Load the effective config for the current working directory.
pub fn load_config() -> Config {
    let global = global_config_path().ok();
    let local = std::env::current_dir()
        .ok()
        .map(|dir| local_config_path(&dir));
    load_config_from(global.as_deref(), local.as_deref())
}

/// Load config from explicit global and local paths.
///
/// Missing files are skipped silently; files that fail to parse are skipped
/// with a warning so a broken global file never blocks generation. Inside a
/// readable layer, `null` means unset and a value of the wrong type is
/// dropped with a warning while the layer's other keys still apply.
pub fn load_config_from(global: Option<&Path>, local: Option<&Path>) -> Config {
    let mut merged = match serde_json::to_value(Config::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for path in [global, local].into_iter().flatten() {
        match read_layer(path) {
            Ok(Some(layer)) => apply_layer(&mut merged, layer, path),
            Ok(None) => {}
            Err(err) => warn!("{err}, ignoring"),
        }
    }

    match serde_json::from_value(Value::Object(merged)) {
        Ok(config) => config,
        Err(err) => {
            warn!("Invalid config values ({err}), falling back to defaults");
            Config::default()
        }
    }
}

fn apply_layer(merged: &mut Map<String, Value>, layer: Map<String, Value>, path: &Path) {
    for (key, value) in layer {
        if value.is_null() {
            continue;
        }
        let previous = merged.insert(key.clone(), value);
        if let Err(err) = serde_json::from_value::<Config>(Value::Object(merged.clone())) {
            warn!(
                path = %path.display(),
                key = %key,
                "Invalid config value ({err}), ignoring"
            );
            match previous {
                Some(previous) => {
                    merged.insert(key, previous);
                }
                None => {
                    merged.remove(&key);
                }
            }
        }
    }
}

fn read_layer(path: &Path) -> Result<Option<Map<String, Value>>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let map = serde_json::from_str::<Map<String, Value>>(&contents).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(Some(map))
}

/// Write `value` as pretty JSON to `path`.
pub fn save_config<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Save global preferences to ~/.apirc.json.
pub fn save_global_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = global_config_path()?;
    save_config(&path, config)?;
    Ok(path)
}

/// Create the project config in `dir`. Returns `Ok(None)` if one already
/// exists and `overwrite` is false.
pub fn init_local_config(dir: &Path, overwrite: bool) -> Result<Option<PathBuf>, ConfigError> {
    let path = local_config_path(dir);
    if path.exists() && !overwrite {
        return Ok(None);
    }
    save_config(&path, &ProjectConfig::default())?;
    Ok(Some(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_files() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(
            Some(&dir.path().join("missing-global.json")),
            Some(&dir.path().join("missing-local.json")),
        );
        assert_eq!(config, Config::default());
        assert_eq!(config.request_module, "@/utils/request");
        assert_eq!(config.timeout, 10_000);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn local_overrides_global_key_by_key() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.json");
        let local = dir.path().join("local.json");
        fs::write(&global, r#"{"typePrefix":"G","timeout":5000}"#).unwrap();
        fs::write(&local, r#"{"typePrefix":"I","apiPrefix":"api"}"#).unwrap();

        let config = load_config_from(Some(&global), Some(&local));
        assert_eq!(config.type_prefix, "I");
        assert_eq!(config.api_prefix, "api");
        assert_eq!(config.timeout, 5000);
        assert!(config.auto_retry);
    }

    #[test]
    fn broken_layer_is_skipped() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.json");
        let local = dir.path().join("local.json");
        fs::write(&global, "{ not json").unwrap();
        fs::write(&local, r#"{"defaultOutputPath":"desktop"}"#).unwrap();

        let config = load_config_from(Some(&global), Some(&local));
        assert_eq!(config.default_output_path, OutputLocation::Desktop);
        assert_eq!(config.timeout, 10_000);
    }

    #[test]
    fn bad_values_are_dropped_key_by_key() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.json");
        let local = dir.path().join("local.json");
        fs::write(
            &global,
            r#"{"typePrefix":null,"timeout":"5000","maxRetries":5,"defaultOutputPath":"Desktop"}"#,
        )
        .unwrap();
        fs::write(&local, r#"{"requestModule":"~/http","apiPrefix":"api"}"#).unwrap();

        let config = load_config_from(Some(&global), Some(&local));
        assert_eq!(config.request_module, "~/http");
        assert_eq!(config.api_prefix, "api");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.type_prefix, "");
        assert_eq!(config.timeout, 10_000);
        assert_eq!(config.default_output_path, OutputLocation::Current);
    }

    #[test]
    fn null_in_local_layer_keeps_the_global_value() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.json");
        let local = dir.path().join("local.json");
        fs::write(&global, r#"{"typePrefix":"G"}"#).unwrap();
        fs::write(&local, r#"{"typePrefix":null,"timeout":true}"#).unwrap();

        let config = load_config_from(Some(&global), Some(&local));
        assert_eq!(config.type_prefix, "G");
        assert_eq!(config.timeout, 10_000);
    }

    #[test]
    fn init_local_config_respects_existing_file() {
        let dir = TempDir::new().unwrap();
        let first = init_local_config(dir.path(), false).unwrap();
        assert!(first.is_some());

        let written = fs::read_to_string(local_config_path(dir.path())).unwrap();
        assert!(written.contains("\"requestModule\": \"@/utils/request\""));

        assert!(init_local_config(dir.path(), false).unwrap().is_none());
        assert!(init_local_config(dir.path(), true).unwrap().is_some());
    }

    #[test]
    fn config_round_trips_camel_case_keys() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"defaultOutputPath\":\"current\""));
        assert!(json.contains("\"maxRetries\":3"));
    }
}
