//! Domain layer for taipan
//!
//! Pure configuration types: the ordered profile list and the resolved
//! settings store. Nothing here touches the filesystem or the environment.

pub mod models;

pub use models::{ProfileList, Settings, SettingsError};
