//! Logging setup for viewer hosts

/// Install `env_logger`, falling back to `default_filter` when `RUST_LOG` is unset
///
/// Returns `false` when a logger was already installed; the existing one is kept.
pub fn init_with_default(default_filter: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
