//! Dispatch arguments.
//!
//! Every dispatch carries a list of [`Arg`]s through to the executing system.
//! Simulate systems expect the acting client first, optionally followed by a
//! "frame" flag.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Opaque handle to the client/actor whose input is being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client({})", self.0)
    }
}

/// A single dispatch argument.
#[derive(Clone)]
pub enum Arg {
    /// An actor/client handle.
    Client(ClientId),
    /// A boolean flag.
    Flag(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// Anything else, for user fallback resolvers.
    Custom(Rc<dyn Any>),
}

impl Arg {
    /// Returns the client handle, if this is [`Arg::Client`].
    #[must_use]
    pub fn as_client(&self) -> Option<ClientId> {
        match self {
            Self::Client(client) => Some(*client),
            _ => None,
        }
    }

    /// Returns the flag, if this is [`Arg::Flag`].
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the number, if this is [`Arg::Int`] or [`Arg::Float`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the custom payload downcast to `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// The variant name, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Client(_) => "client",
            Self::Flag(_) => "flag",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(client) => f.debug_tuple("Client").field(client).finish(),
            Self::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<ClientId> for Arg {
    fn from(client: ClientId) -> Self {
        Self::Client(client)
    }
}

impl From<bool> for Arg {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
