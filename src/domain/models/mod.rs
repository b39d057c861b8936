pub mod profile;
pub mod settings;

pub use profile::ProfileList;
pub use settings::{Settings, SettingsError};
