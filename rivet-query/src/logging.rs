//! Logging infrastructure for Rivet.
//!
//! Structured logging controlled by the `RIVET_DEBUG` environment variable.
//!
//! # Environment Variables
//!
//! - `RIVET_DEBUG=true` / `RIVET_DEBUG=1` - Enable debug logging
//! - `RIVET_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `RIVET_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use rivet_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Inside the crate, association loading reports through the standard
//! tracing macros:
//!
//! ```rust,ignore
//! debug!(model = "Car", association = "wheels", sql = %sql, "Loading association");
//! trace!(model = "Car", association = "owner", "Association skipped");
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `RIVET_DEBUG` environment variable.
///
/// Returns `true` if `RIVET_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("RIVET_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `RIVET_LOG_LEVEL` environment variable.
///
/// Defaults to "debug" if `RIVET_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("RIVET_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `RIVET_LOG_FORMAT` environment variable.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("RIVET_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the Rivet logging system.
///
/// Subsequent calls are no-ops. Without the `tracing-subscriber` feature
/// nothing is installed and events go to whatever subscriber the
/// application set up itself.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("RIVET_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "rivet_orm={},rivet_query={},rivet_sqlite={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Rivet logging initialized"
            );
        }
    });
}

/// Initialize logging with a specific level.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early in your program before
/// spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: only called at program startup before threads are spawned.
    unsafe {
        env::set_var("RIVET_LOG_LEVEL", level);
    }
    init();
}

/// Initialize logging for debugging.
///
/// Equivalent to setting `RIVET_DEBUG=true` and calling `init()`.
///
/// # Safety
///
/// Same caveat as [`init_with_level`].
pub fn init_debug() {
    // SAFETY: only called at program startup before threads are spawned.
    unsafe {
        env::set_var("RIVET_DEBUG", "true");
    }
    init();
}

/// Debug logging that only fires when `RIVET_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! rivet_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Trace logging that only fires when `RIVET_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! rivet_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
