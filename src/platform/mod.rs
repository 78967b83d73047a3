//! Platform abstraction layer
//!
//! Handles browser/native differences in logger setup. Wall-clock time comes
//! from `chrono`, which reads `Date` in the browser.

/// Route `log` output to the browser console
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Route `log` output to stderr, filtered by `RUST_LOG`
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::try_init();
}
