//! `env_logger` setup
//!
//! The library only talks to the `log` facade. Binaries and tests that want
//! output call one of these once; the filter comes from `RUST_LOG`.

use log::LevelFilter;

/// Installs the global logger, defaulting to `info` when `RUST_LOG` is unset.
/// Returns `false` if a logger was already installed.
pub fn init() -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

/// Test-friendly logger: captured by the test harness, `warn` by default
pub fn init_for_tests() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .is_test(true)
        .try_init();
}
