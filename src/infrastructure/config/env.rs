//! Environment variable binding for configuration
//!
//! - Locator variables for the config dir and the profile list
//! - `TPN_*` overrides, captured once per resolution
//! - Env overlay for keys the config files define

use std::collections::HashMap;
use std::sync::Arc;

use figment::providers::Env;
use figment::value::Dict;

use crate::domain::models::settings::{collect_leaf_keys, env_key_suffix};

/// Directory to search for config files
pub const CONFIG_PATH_VAR: &str = "TAIPAN_CONFIG_PATH";

/// Comma-separated profiles to merge over the base config
pub const PROFILES_VAR: &str = "TAIPAN_PROFILES";

/// Directory searched when [`CONFIG_PATH_VAR`] is unset
pub const DEFAULT_CONFIG_DIR: &str = "resources";

/// Prefix of variables that override individual settings
pub const ENV_PREFIX: &str = "TPN";

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Environment variable that overrides `key`.
///
/// `database.password` binds to `TPN_DATABASE_PASSWORD`, `local-config` to
/// `TPN_LOCAL_CONFIG`.
pub fn env_key_for(key: &str) -> String {
    format!("{ENV_PREFIX}_{}", env_key_suffix(key).to_uppercase())
}

/// Every non-empty `TPN_*` variable, keyed by its lowercased suffix.
///
/// `TPN_DATABASE_PASSWORD=secret` becomes `database_password -> secret`.
pub fn env_overrides() -> HashMap<String, String> {
    let prefix = format!("{ENV_PREFIX}_");

    std::env::vars_os()
        .filter_map(|(name, value)| {
            let name = name.into_string().ok()?;
            let value = value.into_string().ok()?;
            let suffix = name.strip_prefix(&prefix)?;
            (!suffix.is_empty() && !value.is_empty()).then(|| (suffix.to_lowercase(), value))
        })
        .collect()
}

/// Env provider exposing overridden file keys under their original spelling.
///
/// `layers` is the merged file data. A leaf key is bound to [`env_key_for`]
/// the key only when `overrides` holds a value for it, so unset and empty
/// variables leave the file value alone. Key case is preserved: `dbHost`
/// is replaced by `TPN_DBHOST`, not shadowed by a new `dbhost` key.
pub fn bound_env(layers: &Dict, overrides: &HashMap<String, String>) -> Env {
    let mut keys = Vec::new();
    collect_leaf_keys(None, layers, &mut keys);

    let bindings: Arc<HashMap<String, String>> = Arc::new(
        keys.into_iter()
            .filter(|key| overrides.contains_key(&env_key_suffix(key)))
            .map(|key| (env_key_for(&key), key))
            .collect(),
    );

    Env::raw().lowercase(false).filter_map(move |name| {
        bindings
            .get(&name.as_str().to_ascii_uppercase())
            .map(|key| key.clone().into())
    })
}
