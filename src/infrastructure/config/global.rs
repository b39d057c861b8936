//! Process-wide configuration handle.
//!
//! The first caller resolves the configuration from the environment (see
//! [`ConfigLoader::from_env`]); everyone else gets the cached instance. The
//! whole resolution runs under one lock so concurrent first callers never
//! observe a half-merged store and only one of them touches the filesystem.

use std::sync::{Arc, Mutex, PoisonError};

use super::loader::{ConfigError, ConfigLoader};
use crate::domain::models::Settings;

/// Global settings, `None` until first resolved
static GLOBAL_CONFIG: Mutex<Option<Arc<Settings>>> = Mutex::new(None);

#[cfg(test)]
static RESOLUTIONS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Shared configuration, resolving it on first use.
///
/// For example `TAIPAN_PROFILES="profile1,profile2"` merges, in order:
/// `config.yaml`, `config-profile1.yaml`, `config-profile2.yaml`,
/// `config-local.yaml`.
///
/// # Panics
///
/// Panics if the base config or any requested profile cannot be loaded. A
/// missing `config-local.yaml` is ignored.
pub fn config() -> Arc<Settings> {
    match try_config() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "configuration could not be resolved");
            panic!("{err}");
        }
    }
}

/// Like [`config`], but returns the load error instead of panicking.
///
/// Nothing is cached on error, so a later call resolves again.
pub fn try_config() -> Result<Arc<Settings>, ConfigError> {
    // the holder is only written once resolution succeeds, so a poisoned
    // lock never guards partial state
    let mut slot = GLOBAL_CONFIG
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(settings) = slot.as_ref() {
        return Ok(Arc::clone(settings));
    }

    let settings = Arc::new(ConfigLoader::from_env().load()?);

    #[cfg(test)]
    RESOLUTIONS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    *slot = Some(Arc::clone(&settings));
    Ok(settings)
}

/// Drop the cached configuration so the next call resolves again
#[cfg(test)]
pub(crate) fn reset() {
    *GLOBAL_CONFIG
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = None;
}
