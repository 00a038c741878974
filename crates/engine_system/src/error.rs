//! Execution error types.

/// Caller errors raised while executing a system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    /// A simulate system was dispatched without any arguments.
    #[error("system `{system}` simulates input and requires a client as its first argument")]
    MissingActor {
        /// The system that was being executed.
        system: &'static str,
    },

    /// A simulate system was dispatched with a non-client first argument.
    #[error("system `{system}` expected a client as its first argument, found {found}")]
    InvalidActor {
        /// The system that was being executed.
        system: &'static str,
        /// The kind of argument that was passed instead.
        found: &'static str,
    },
}
