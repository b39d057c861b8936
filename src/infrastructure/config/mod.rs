//! Configuration management infrastructure
//!
//! Profile-aware layering using figment:
//! - Base `config.yaml` from the config directory
//! - Profile overlays merged in the requested order
//! - Optional `config-local.yaml` override
//! - `TPN_*` environment variable overrides
//! - Lazily resolved process-wide handle

pub mod env;
pub mod global;
pub mod loader;

pub use global::{config, try_config};
pub use loader::{ConfigError, ConfigLayer, ConfigLoader};
