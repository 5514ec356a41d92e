#![deny(missing_docs)]

//! Defines the output format of traces, events, and spans produced
//! by `rippling` and the libraries it consumes.

mod formatter;

use tracing_subscriber::EnvFilter;

pub use tracing_core::Level;

/// possible log levels
pub const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Environment variable holding an `EnvFilter` directive, consulted
/// only when no explicit level was requested.
pub const LOG_ENV_VAR: &str = "RIPPLING_LOG";

/// Initializes a global tracing subscriber that formats
/// all logs produced by an application that calls init,
/// and all logs produced by libraries consumed by that application.
///
/// Logs always go to stderr. The more verbose the level, the more
/// detail each line carries: `trace` includes thread ids so the
/// foreground and callback listener threads of a login can be told apart.
pub fn init(level: Option<Level>) {
    match level {
        Some(level) if level == Level::TRACE => formatter::very_verbose(level),
        Some(level) if level == Level::DEBUG => formatter::verbose(level),
        Some(level) => formatter::least_verbose(level),
        // by default, no logs are printed.
        None => {
            if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
                formatter::filtered(filter);
            }
        }
    }
}
