//! Taipan - layered, profile-aware process configuration
//!
//! Taipan builds one settings store per process from a base YAML file,
//! zero or more named profile overlays and an optional local override, with
//! `TPN_*` environment variables taking precedence over every file.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): profile lists and the resolved settings store
//! - **Infrastructure Layer** (`infrastructure`): file/env loading, the
//!   process-wide handle, and logging setup
//!
//! # Example
//!
//! ```no_run
//! // TAIPAN_CONFIG_PATH=resources TAIPAN_PROFILES=staging,production
//! let config = taipan::config();
//! let port = config.get_int("port")?;
//! let password = config.get_string("database.password")?;
//! # Ok::<(), taipan::SettingsError>(())
//! ```

pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{ProfileList, Settings, SettingsError};
pub use infrastructure::config::{config, try_config, ConfigError, ConfigLayer, ConfigLoader};
pub use infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
