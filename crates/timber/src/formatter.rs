use crate::Level;

use tracing_subscriber::{fmt, EnvFilter};

use std::io;

// `try_init` so that a second initialisation (e.g. from a test harness)
// leaves the first subscriber in place instead of panicking.

pub(crate) fn least_verbose(level: Level) {
    let format = fmt::format().without_time().with_target(false).compact();
    let _ = fmt()
        .with_max_level(level)
        .event_format(format)
        .with_writer(io::stderr)
        .try_init();
}

pub(crate) fn verbose(level: Level) {
    let _ = fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

pub(crate) fn very_verbose(level: Level) {
    let _ = fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_thread_ids(true)
        .with_thread_names(true)
        .try_init();
}

pub(crate) fn filtered(filter: EnvFilter) {
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
