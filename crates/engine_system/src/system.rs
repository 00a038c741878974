//! The [`System`] trait and its optional capabilities.

use std::any::Any;
use std::fmt;

use engine_query::{Output, Query};

use crate::args::ClientId;
use crate::realm::RealmAffinity;

/// Opaque handle for a registered system.
///
/// Issued by the world at registration and used as the query cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u64);

impl SystemId {
    /// Create a system id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System({})", self.0)
    }
}

/// Upcasts to [`Any`] so type-erased systems can be downcast to their
/// concrete type by fallback resolvers.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of per-tick logic over entities of type `E`.
pub trait System<E>: AsAny {
    /// A human-readable name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether the filtered query may be cached across dispatches.
    fn supports_caching(&self) -> bool;

    /// Narrows `query` to the entities this system works on.
    fn filter_entities(&self, query: &mut Query<E>);

    /// Which realm the system runs in.
    fn affinity(&self) -> RealmAffinity {
        RealmAffinity::Shared
    }

    /// The tick capability, if this system has one.
    fn as_tick(&mut self) -> Option<&mut dyn TickSystem<E>> {
        None
    }

    /// The simulate capability, if this system has one.
    fn as_simulate(&mut self) -> Option<&mut dyn SimulateSystem<E>> {
        None
    }
}

/// A system that runs on every server tick.
pub trait TickSystem<E> {
    /// Invoked once per tick with the filtered entities.
    fn tick(&mut self, entities: Output<'_, E>);
}

/// A system that runs on client input prediction.
pub trait SimulateSystem<E> {
    /// Invoked on each input prediction.
    fn simulate(&mut self, entities: Output<'_, E>, client: ClientId);

    /// Invoked on each per-frame input prediction (client only).
    fn frame_simulate(&mut self, entities: Output<'_, E>, client: ClientId);
}
