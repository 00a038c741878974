//! Context handed to the user fallback resolver.

use std::any::Any;

use engine_query::Query;
use engine_system::{Arg, Realm, SystemId};

/// A system that no built-in capability executed.
///
/// The system and its query are type-erased; a fallback resolver downcasts
/// them to the concrete types it knows how to run.
pub struct Unhandled<'a> {
    pub(crate) id: SystemId,
    pub(crate) name: &'static str,
    pub(crate) system: &'a mut dyn Any,
    pub(crate) query: &'a dyn Any,
    pub(crate) args: &'a [Arg],
    pub(crate) realm: Realm,
}

impl<'a> Unhandled<'a> {
    /// The system's registration handle.
    #[must_use]
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// The system's diagnostic name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The system, if it is an `S`.
    pub fn system_mut<S: Any>(&mut self) -> Option<&mut S> {
        self.system.downcast_mut::<S>()
    }

    /// The system's filtered query, if its entity type is `E`.
    #[must_use]
    pub fn query<E: 'static>(&self) -> Option<&'a Query<E>> {
        self.query.downcast_ref::<Query<E>>()
    }

    /// The dispatch arguments.
    #[must_use]
    pub fn args(&self) -> &'a [Arg] {
        self.args
    }

    /// The realm of the dispatch.
    #[must_use]
    pub fn realm(&self) -> Realm {
        self.realm
    }
}
