//! Infrastructure layer module
//!
//! Adapters that touch the outside world:
//! - Configuration loading from files and environment variables
//! - Logging setup driven by the resolved configuration

pub mod config;
pub mod logging;
