//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding `config.yaml`, `config-staging.yaml` and `config-production.yaml`
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/resources")
}

/// Directory holding a `config-local.yaml` that sets `local-config`
#[allow(dead_code)]
pub fn local_fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/local")
}

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create a temporary config directory populated with `files`
///
/// Each entry is a file name and its YAML contents.
#[allow(dead_code)]
pub fn config_dir_with(files: &[(&str, &str)]) -> TempDir {
    let dir = temp_dir();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("Failed to write config file");
    }
    dir
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
