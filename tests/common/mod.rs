//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use gedcom_core::{Database, RecordId};
use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; later calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[allow(dead_code)]
pub fn load_family() -> Database {
    init_logging();
    Database::from_path(fixture_path("family.ged")).unwrap()
}

/// Write `text` to `name` inside `temp_dir` and return the path.
#[allow(dead_code)]
pub fn write_file(temp_dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[allow(dead_code)]
pub fn pointers(db: &Database, ids: &[RecordId]) -> Vec<String> {
    ids.iter()
        .map(|id| db.record(*id).unwrap().pointer().to_string())
        .collect()
}
