//! Test logging utilities
//!
//! Installs a `tracing` subscriber that writes through the test harness, so
//! output is captured per test and shown only on failure.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
///
/// Verbosity is controlled with `RUST_LOG`, e.g.
/// `RUST_LOG=graphql_harness_server=debug`. Calling this more than once, or
/// after another subscriber was installed, is a no-op.
///
/// # Examples
///
/// ```
/// use graphql_harness_test::logging::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::from_default_env())
			.with_test_writer()
			.try_init();
	});
}
