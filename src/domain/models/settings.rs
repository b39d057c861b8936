//! Resolved settings store.
//!
//! A read-only view over a merged [`Figment`]. Keys are dot-separated paths
//! (`database.password`); nested maps from every layer have already been
//! merged, so lookups never need to know which file a value came from.
//!
//! Keys no file defines can still be supplied through the environment
//! overrides captured at resolution time.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::Serialized;
use figment::value::{Dict, Value};
use figment::Figment;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised when reading values out of [`Settings`]
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Setting not found: {0}")]
    MissingKey(String),

    #[error("Setting '{key}' has an unexpected type: {source}")]
    InvalidType {
        key: String,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Failed to extract settings: {0}")]
    Extract(#[source] Box<figment::Error>),
}

// Slot used to deserialize a single environment value
const ENV_VALUE_KEY: &str = "value";

/// Fully merged configuration for the process
#[derive(Clone)]
pub struct Settings {
    figment: Figment,
    sources: Vec<PathBuf>,
    env_overrides: HashMap<String, String>,
}

impl Settings {
    /// Wrap an already merged figment.
    ///
    /// `sources` lists the files that contributed, lowest precedence first.
    pub fn new(figment: Figment, sources: Vec<PathBuf>) -> Self {
        Self {
            figment,
            sources,
            env_overrides: HashMap::new(),
        }
    }

    /// Attach environment values for keys the merged files do not define.
    ///
    /// `overrides` is keyed by [`env_key_suffix`] of the setting key, so
    /// `database_password` answers `database.password`. Empty values never
    /// count as set.
    #[must_use]
    pub fn with_env_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.env_overrides = overrides
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();
        self
    }

    /// Deserialize the value at `key` into `T`, or the section rooted there
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, SettingsError> {
        let invalid = |source: figment::Error| SettingsError::InvalidType {
            key: key.to_string(),
            source: Box::new(source),
        };

        if self.figment.contains(key) {
            return self.figment.extract_inner(key).map_err(invalid);
        }

        match self.env_value(key) {
            Some(value) => Figment::from(Serialized::default(ENV_VALUE_KEY, value))
                .extract_inner(ENV_VALUE_KEY)
                .map_err(invalid),
            None => Err(SettingsError::MissingKey(key.to_string())),
        }
    }

    /// Read a scalar as text. Numbers and booleans are rendered, maps and
    /// arrays are rejected.
    pub fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        let value = self.find(key)?;

        let rendered = match &value {
            Value::String(_, s) => Some(s.clone()),
            Value::Char(_, c) => Some(c.to_string()),
            Value::Bool(_, b) => Some(b.to_string()),
            Value::Num(..) => value
                .to_i128()
                .map(|n| n.to_string())
                .or_else(|| value.to_f64().map(|f| f.to_string())),
            _ => None,
        };

        match rendered {
            Some(s) => Ok(s),
            None => self.get::<String>(key),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i64, SettingsError> {
        self.get(key)
    }

    pub fn get_float(&self, key: &str) -> Result<f64, SettingsError> {
        self.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, SettingsError> {
        self.get(key)
    }

    /// Whether any layer defines `key`
    pub fn contains(&self, key: &str) -> bool {
        self.figment.contains(key) || self.env_value(key).is_some()
    }

    /// All leaf keys of the merged layers as dot-separated paths, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Ok(root) = self.figment.extract::<Dict>() {
            collect_leaf_keys(None, &root, &mut keys);
        }
        keys.sort();
        keys
    }

    /// Deserialize the whole store into a typed struct
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, SettingsError> {
        self.figment
            .extract()
            .map_err(|e| SettingsError::Extract(Box::new(e)))
    }

    /// The full settings tree as JSON
    pub fn to_json(&self) -> Result<serde_json::Value, SettingsError> {
        self.extract()
    }

    /// Files merged into this store, lowest precedence first
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Whether `path` was one of the merged files
    pub fn loaded_from(&self, path: &Path) -> bool {
        self.sources.iter().any(|source| source == path)
    }

    /// The underlying figment, for callers that need provider metadata
    pub fn figment(&self) -> &Figment {
        &self.figment
    }

    fn find(&self, key: &str) -> Result<Value, SettingsError> {
        self.figment
            .find_value(key)
            .ok()
            .or_else(|| self.env_value(key))
            .ok_or_else(|| SettingsError::MissingKey(key.to_string()))
    }

    fn env_value(&self, key: &str) -> Option<Value> {
        self.env_overrides
            .get(&env_key_suffix(key))
            .and_then(|raw| raw.parse::<Value>().ok())
    }
}

/// Lowercased environment form of a setting key, without the prefix.
///
/// `.` and `-` become `_`: `database.password` and `database-password` both
/// map to `database_password`.
pub fn env_key_suffix(key: &str) -> String {
    key.replace(['.', '-'], "_").to_lowercase()
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("sources", &self.sources)
            .field("keys", &self.keys())
            .finish()
    }
}

/// Walk `dict` and push the dotted path of every non-map value.
pub(crate) fn collect_leaf_keys(prefix: Option<&str>, dict: &Dict, out: &mut Vec<String>) {
    for (name, value) in dict {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };

        match value {
            Value::Dict(_, nested) if !nested.is_empty() => {
                collect_leaf_keys(Some(&path), nested, out);
            }
            _ => out.push(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Yaml};
    use serde::Deserialize;

    fn settings(yaml: &str) -> Settings {
        Settings::new(Figment::from(Yaml::string(yaml)), vec![])
    }

    #[test]
    fn test_typed_getters() {
        let settings = settings(
            r"
port: 8080
ratio: 0.5
enabled: true
database:
  username: usr
",
        );

        assert_eq!(settings.get_int("port").unwrap(), 8080);
        assert!((settings.get_float("ratio").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!(settings.get_bool("enabled").unwrap());
        assert_eq!(settings.get_string("database.username").unwrap(), "usr");
    }

    #[test]
    fn test_get_string_renders_scalars() {
        let settings = settings("port: 80\nenabled: false\n");

        assert_eq!(settings.get_string("port").unwrap(), "80");
        assert_eq!(settings.get_string("enabled").unwrap(), "false");
    }

    #[test]
    fn test_missing_key() {
        let settings = settings("port: 80\n");

        assert!(!settings.contains("database.username"));
        assert!(matches!(
            settings.get_string("database.username"),
            Err(SettingsError::MissingKey(key)) if key == "database.username"
        ));
        assert!(matches!(
            settings.get_int("nope"),
            Err(SettingsError::MissingKey(_))
        ));
    }

    #[test]
    fn test_invalid_type() {
        let settings = settings("port: not-a-number\n");

        match settings.get_int("port") {
            Err(SettingsError::InvalidType { key, .. }) => assert_eq!(key, "port"),
            other => panic!("Expected InvalidType error, got {other:?}"),
        }
    }

    #[test]
    fn test_keys_lists_leaves_sorted() {
        let settings = settings(
            r"
port: 8080
local-config: some-value
database:
  username: usr
  password: pwd
",
        );

        assert_eq!(
            settings.keys(),
            vec![
                "database.password",
                "database.username",
                "local-config",
                "port"
            ]
        );
    }

    #[test]
    fn test_extract_section() {
        #[derive(Debug, Deserialize)]
        struct Database {
            username: String,
            password: String,
        }

        let settings = settings("database:\n  username: usr\n  password: pwd\n");
        let database: Database = settings.get("database").unwrap();

        assert_eq!(database.username, "usr");
        assert_eq!(database.password, "pwd");
    }

    fn with_env(yaml: &str, overrides: &[(&str, &str)]) -> Settings {
        settings(yaml).with_env_overrides(
            overrides
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_env_key_suffix() {
        assert_eq!(env_key_suffix("database.password"), "database_password");
        assert_eq!(env_key_suffix("local-config"), "local_config");
        assert_eq!(env_key_suffix("dbHost"), "dbhost");
    }

    #[test]
    fn test_env_value_for_key_no_file_defines() {
        let settings = with_env("port: 8080\n", &[("database_password", "secret")]);

        assert!(settings.contains("database.password"));
        assert_eq!(settings.get_string("database.password").unwrap(), "secret");
        assert_eq!(settings.get_int("port").unwrap(), 8080);
        // not a file key, so not listed
        assert_eq!(settings.keys(), vec!["port"]);
    }

    #[test]
    fn test_env_value_is_typed() {
        let settings = with_env(
            "port: 8080\n",
            &[("timeout", "30"), ("verbose", "true"), ("ratio", "0.25")],
        );

        assert_eq!(settings.get_int("timeout").unwrap(), 30);
        assert_eq!(settings.get_string("timeout").unwrap(), "30");
        assert!(settings.get_bool("verbose").unwrap());
        assert!((settings.get_float("ratio").unwrap() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_env_value_lookup_ignores_case_and_separators() {
        let settings = with_env("port: 8080\n", &[("API_KEY", "k")]);

        assert_eq!(settings.get_string("api.key").unwrap(), "k");
        assert_eq!(settings.get_string("Api-Key").unwrap(), "k");
    }

    #[test]
    fn test_empty_env_value_is_unset() {
        let settings = with_env("port: 8080\n", &[("token", "")]);

        assert!(!settings.contains("token"));
        assert!(matches!(
            settings.get_string("token"),
            Err(SettingsError::MissingKey(_))
        ));
    }

    #[test]
    fn test_file_value_wins_over_unmerged_env_value() {
        // env values for file keys are merged by the loader; the fallback
        // only answers misses
        let settings = with_env("port: 8080\n", &[("port", "9090")]);

        assert_eq!(settings.get_int("port").unwrap(), 8080);
    }

    #[test]
    fn test_to_json() {
        let settings = settings("port: 8080\ndatabase:\n  username: usr\n");
        let json = settings.to_json().unwrap();

        assert_eq!(json["port"], 8080);
        assert_eq!(json["database"]["username"], "usr");
    }
}
