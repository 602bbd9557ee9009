//! Database repositories
//
// Image records
pub mod image;
//
// Transaction utilities
pub mod transaction;
//
// In-memory repository for tests of the layers above
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
