//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! liquidation engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `adapters`: In-memory implementations of the persistence ports
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators
//! - `logging`: Test log output

pub mod fixtures;
pub mod builders;
pub mod adapters;
pub mod assertions;
pub mod generators;
pub mod logging;

pub use fixtures::*;
pub use builders::*;
pub use adapters::*;
pub use assertions::*;
pub use generators::*;
pub use logging::init_test_tracing;
