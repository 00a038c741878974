//! World-level error types.

use std::path::PathBuf;

use engine_system::{ExecuteError, SystemId};

/// Errors returned by [`World`](crate::World) operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A system of the same concrete type is already registered.
    #[error("a system of type `{name}` already exists")]
    DuplicateSystem {
        /// The concrete type name of the rejected system.
        name: &'static str,
    },

    /// No system is registered under this id.
    #[error("no system registered as {0}")]
    UnknownSystem(SystemId),

    /// A system could not be executed with the given arguments.
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Errors raised while loading an [`EcsConfig`](crate::EcsConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration document is not valid.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
