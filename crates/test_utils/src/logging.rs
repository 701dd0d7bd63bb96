//! Log output for tests
//!
//! Set `RUST_LOG=debug` to see engine logs while running tests.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TEST_TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
});

/// Installs the test subscriber once per test binary
pub fn init_test_tracing() {
    Lazy::force(&TEST_TRACING);
}
