//! `env_logger` setup. Library `tracing` events arrive through the `log`
//! bridge.

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize logging once. Levels come from `RUST_LOG`; defaults to `warn`
/// so command output stays clean.
pub fn init() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .format_timestamp_micros()
            .target(env_logger::Target::Stderr)
            .init();

        log::debug!("logging initialized");
    });
}
