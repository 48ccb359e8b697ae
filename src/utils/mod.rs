//! Utilities: logging setup.
//!
//!   derive_level(verbose, quiet) -> Level
//!   init_logging(level)            stderr subscriber, RUST_LOG overrides
//!
//! stdout carries command output only; every diagnostic goes to stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Map `-q` / `-v` / `-vv` to a level. `quiet` wins over `verbose`.
pub fn derive_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
