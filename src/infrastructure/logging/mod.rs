//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, configured from
//! the `logging` section of the resolved settings:
//! - JSON or pretty stderr output
//! - Optional rolling JSON log files

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
