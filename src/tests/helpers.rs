//! Shared fixtures for in-crate tests

use crate::{database::Database, record::RecordId};

/// Three generations of Smiths with natural-parent markers, one adopted child, an unresolved
/// `CHIL` reference, and a multi-line note.
pub const FAMILY: &str = include_str!("../../tests/fixtures/family.ged");

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn family_db() -> Database {
    init_logging();
    Database::parse_str(FAMILY).expect("family fixture parses")
}

/// Resolve a pointer that the test knows is declared.
pub fn id(db: &Database, pointer: &str) -> RecordId {
    db.get(pointer)
        .unwrap_or_else(|| panic!("{pointer} should be declared"))
}

/// Pointers of the given records, for readable assertions.
pub fn pointers(db: &Database, ids: &[RecordId]) -> Vec<String> {
    ids.iter()
        .map(|id| db.record(*id).unwrap().pointer().to_string())
        .collect()
}
