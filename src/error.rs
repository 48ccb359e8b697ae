//! Startup (build-time) errors.
//!
//! Everything here is fatal: the command tree is never handed to the user
//! when one of these is raised. Per-invocation failures (transport errors,
//! non-2xx replies) are not errors at all; see `api::Outcome`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A descriptor was declared without a namespace.
    #[error("endpoint descriptor has an empty namespace (path: '{path}')")]
    EmptyNamespace { path: String },

    /// Two descriptors map onto the same command.
    #[error("duplicate command '{name}': '{first}' and '{second}' both derive it")]
    DuplicateCommand {
        name: String,
        first: String,
        second: String,
    },

    /// A namespace shadows a built-in subcommand.
    #[error("namespace '{name}' collides with the built-in '{name}' command")]
    ReservedName { name: String },

    #[error("invalid parameter '--{flag}' on '{command}': {reason}")]
    InvalidParameter {
        command: String,
        flag: String,
        reason: String,
    },

    #[error("invalid target '{host}:{port}': {reason}")]
    InvalidRoot {
        host: String,
        port: String,
        reason: String,
    },
}
