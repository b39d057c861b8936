use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::{Format, Yaml};
use figment::value::Dict;
use figment::{Figment, Provider};
use thiserror::Error;
use tracing::{debug, info};

use super::env::{
    bound_env, env_overrides, env_var_or_none, CONFIG_PATH_VAR, DEFAULT_CONFIG_DIR, PROFILES_VAR,
};
use crate::domain::models::{ProfileList, Settings};

/// Name of the required base config file, without extension
pub const BASE_CONFIG_NAME: &str = "config";

/// Name of the optional local override file, without extension
pub const LOCAL_CONFIG_NAME: &str = "config-local";

/// Extensions tried for every config file, in order
const CONFIG_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load base config file: no config.yaml in {}", .dir.display())]
    BaseConfigMissing { dir: PathBuf },

    #[error(
        "Failed to load config file for profile '{profile}': no config-{profile}.yaml in {}",
        .dir.display()
    )]
    ProfileConfigMissing { profile: String, dir: PathBuf },

    #[error("Failed to parse {layer} config file {}: {source}", .path.display())]
    InvalidConfigFile {
        layer: ConfigLayer,
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Failed to merge configuration layers: {0}")]
    Merge(#[source] Box<figment::Error>),

    #[error("Cannot resolve config search path {}: {source}", .path.display())]
    ConfigDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which layer a config file belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    Base,
    Profile(String),
    Local,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Profile(name) => write!(f, "profile '{name}'"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Configuration loader with profile-aware layering
///
/// Precedence (lowest to highest):
/// 1. `<config_dir>/config.yaml` (required)
/// 2. `<config_dir>/config-<profile>.yaml` for each profile, in list order (required when named)
/// 3. `config-local.yaml` from the config dir or the local dir (optional)
/// 4. `TPN_*` environment variables, for any key
///
/// The environment is read once, by [`ConfigLoader::load`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    profiles: ProfileList,
    local_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader for `config_dir` with no profiles, searching the working
    /// directory for the local override.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            profiles: ProfileList::default(),
            local_dir: Some(PathBuf::from(".")),
        }
    }

    /// Loader configured from `TAIPAN_CONFIG_PATH` and `TAIPAN_PROFILES`
    pub fn from_env() -> Self {
        let config_dir =
            env_var_or_none(CONFIG_PATH_VAR).unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
        let profiles = env_var_or_none(PROFILES_VAR)
            .map(|raw| ProfileList::parse(&raw))
            .unwrap_or_default();

        Self::new(config_dir).with_profiles(profiles)
    }

    #[must_use]
    pub fn with_profiles(mut self, profiles: ProfileList) -> Self {
        self.profiles = profiles;
        self
    }

    /// Extra directory searched for `config-local.yaml` after the config dir
    #[must_use]
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = Some(dir.into());
        self
    }

    /// Only look for `config-local.yaml` in the config dir
    #[must_use]
    pub fn without_local_dir(mut self) -> Self {
        self.local_dir = None;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn profiles(&self) -> &ProfileList {
        &self.profiles
    }

    /// Load and merge every layer
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config_dir = absolute(&self.config_dir)?;
        let mut figment = Figment::new();
        let mut sources = Vec::new();

        let base = find_config_file(std::slice::from_ref(&config_dir), BASE_CONFIG_NAME)
            .ok_or_else(|| ConfigError::BaseConfigMissing {
                dir: config_dir.clone(),
            })?;
        figment = merge_layer(figment, &base, ConfigLayer::Base)?;
        sources.push(base);

        for profile in &self.profiles {
            let name = format!("{BASE_CONFIG_NAME}-{profile}");
            let path = find_config_file(std::slice::from_ref(&config_dir), &name).ok_or_else(
                || ConfigError::ProfileConfigMissing {
                    profile: profile.clone(),
                    dir: config_dir.clone(),
                },
            )?;
            figment = merge_layer(figment, &path, ConfigLayer::Profile(profile.clone()))?;
            sources.push(path);
        }

        let mut local_search = vec![config_dir.clone()];
        if let Some(dir) = &self.local_dir {
            local_search.push(absolute(dir)?);
        }
        match find_config_file(&local_search, LOCAL_CONFIG_NAME) {
            Some(path) => {
                figment = merge_layer(figment, &path, ConfigLayer::Local)?;
                info!(path = %path.display(), "Loaded local config");
                sources.push(path);
            }
            None => debug!("no {LOCAL_CONFIG_NAME}.yaml found, skipping local overrides"),
        }

        let layers: Dict = figment
            .extract()
            .map_err(|e| ConfigError::Merge(Box::new(e)))?;
        let overrides = env_overrides();
        let figment = figment.merge(bound_env(&layers, &overrides));

        info!(
            config_dir = %config_dir.display(),
            profiles = %self.profiles,
            files = sources.len(),
            env_overrides = overrides.len(),
            "configuration resolved"
        );

        Ok(Settings::new(figment, sources).with_env_overrides(overrides))
    }
}

/// Validate the YAML at `path` and merge it over `figment`
fn merge_layer(figment: Figment, path: &Path, layer: ConfigLayer) -> Result<Figment, ConfigError> {
    debug!(%layer, path = %path.display(), "merging config layer");

    let provider = Yaml::file(path);
    provider
        .data()
        .map_err(|source| ConfigError::InvalidConfigFile {
            layer,
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

    Ok(figment.merge(provider))
}

/// First `<dir>/<name>.<ext>` that exists, trying dirs in order
fn find_config_file(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| {
            CONFIG_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{name}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
}

// Yaml::file searches parent directories for relative paths
fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::ConfigDirUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
