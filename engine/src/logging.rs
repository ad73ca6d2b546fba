//! Logger setup for hosts and the sandbox binary
//!
//! The engine only emits through the `log` facade. Hosts that already
//! install a logger can skip this module entirely.
//!
//! By default only this crate's targets are shown at the chosen level;
//! everything else is held to warnings. `RUST_LOG` replaces the whole
//! default filter.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Log targets that follow the verbosity switch.
const ENGINE_TARGETS: [&str; 2] = ["gravwell_engine", "orbit_sandbox"];

/// Build the default `env_logger` filter string.
///
/// # Arguments
/// * `verbose` - Debug level for engine targets instead of info
///
/// # Returns
/// A directive list such as `warn,gravwell_engine=info,orbit_sandbox=info`.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let level = level.as_str().to_ascii_lowercase();

    let mut directives = vec![LevelFilter::Warn.as_str().to_ascii_lowercase()];
    directives.extend(ENGINE_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Install the global logger with millisecond timestamps.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // A logger may already be installed (tests, embedding hosts)
    if builder.try_init().is_err() {
        log::debug!("logger already installed, keeping it");
    }
}
