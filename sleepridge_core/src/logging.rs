//! Tracing setup for the `sleepridge` binary.
//!
//! Logs go to stderr; stdout carries only the one-line result printed by
//! `main`, so the report path can be captured by scripts.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber at INFO unless `RUST_LOG` says otherwise
pub fn init() {
    init_with_level("info")
}

/// Install the subscriber with `default_level` as the fallback filter
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route debug logs into the test harness output; safe to call repeatedly
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
