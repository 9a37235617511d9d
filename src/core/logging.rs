//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// vegscan::core::logging::init();
/// log::info!("Scanner ready");
/// ```
pub fn init() {
    // Tests and binaries may both reach this; a second init is harmless.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
