pub mod config;

/// Common utilities shared across the makeline workspace
///
/// This crate provides shared functionality used by the order pipeline
/// crates, including:
///
/// - Configuration loading (YAML file plus `ORDER_DB_*` environment overrides)
/// - Shared test utilities (unique identifiers, test store location)

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, get_test_mongo_url};
