//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Storage (LocalStorage on web, files on native)
//! - The JS-facing ritual handle (web only)

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStore, WebRitual};

/// Install the console logger and panic hook. Repeated calls are harmless.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install env_logger (`RUST_LOG` overrides the `info` default). Repeated
/// calls are harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
