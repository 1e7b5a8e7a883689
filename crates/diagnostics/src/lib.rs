//! Operational diagnostics for the verbosefs workspace
//!
//! This is the tool's own logging, kept apart from the audit records that
//! `verbosefs` writes to its info stream.
//!
//! Usage:
//! - Set VERBOSEFS_LOG=off (default) - no logs
//! - Set VERBOSEFS_LOG=info - wrapper setup and CLI progress
//! - Set VERBOSEFS_LOG=debug - per-operation detail

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the minimum diagnostics level
pub const LOG_ENV: &str = "VERBOSEFS_LOG";

static INIT: Once = Once::new();

/// Minimum level for a `VERBOSEFS_LOG` value, `None` meaning disabled.
///
/// Unknown values fall back to info.
#[must_use]
pub fn parse_level(value: &str) -> Option<emit::Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "" => None,
        "debug" => Some(emit::Level::Debug),
        "warn" => Some(emit::Level::Warn),
        "error" => Some(emit::Level::Error),
        _ => Some(emit::Level::Info),
    }
}

/// Initialize diagnostics based on the VERBOSEFS_LOG environment variable
///
/// Safe to call more than once; only the first call has any effect.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let setting = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let Some(level) = parse_level(&setting) else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime must outlive every emitter; the process owns it from here.
        std::mem::forget(rt);
    });
}

/// Log basic operations (wrapper setup, CLI steps)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable problems, such as an audit record lost behind a delegate failure
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that stop an operation
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
