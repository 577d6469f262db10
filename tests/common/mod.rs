//! Shared test support.

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a `tracing` subscriber once per test binary, so the crate's
/// `debug!`/`warn!` events show up under `cargo test -- --nocapture`
/// (or whatever `RUST_LOG` filter the caller sets).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
