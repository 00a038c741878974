//! Snapshot sources for queries.

use std::fmt;

/// Identifies an externally owned entity collection.
///
/// Handles are issued by the world when a host registers a collection. Two
/// collections with equal contents still have different handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub u64);

impl CollectionId {
    /// Create a collection id from a raw `u64`.
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

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection({})", self.0)
    }
}

enum Entities<'a, E> {
    Slice(&'a [E]),
    Provider(&'a dyn Fn() -> Vec<E>),
}

/// Candidate entities for a dispatch or a query.
///
/// A source is cheap to copy and can be snapshotted any number of times.
/// Provider sources are only invoked when a snapshot is actually taken, so a
/// cache hit never enumerates the host's entities.
pub struct EntitySource<'a, E> {
    entities: Entities<'a, E>,
    collection: Option<CollectionId>,
}

impl<'a, E> EntitySource<'a, E> {
    /// A source over a borrowed slice.
    #[must_use]
    pub fn slice(entities: &'a [E]) -> Self {
        Self {
            entities: Entities::Slice(entities),
            collection: None,
        }
    }

    /// A source that calls `provider` each time a snapshot is taken.
    #[must_use]
    pub fn provider(provider: &'a dyn Fn() -> Vec<E>) -> Self {
        Self {
            entities: Entities::Provider(provider),
            collection: None,
        }
    }

    /// Marks this source as coming from a registered host collection.
    #[must_use]
    pub fn in_collection(mut self, collection: CollectionId) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Returns the collection this source belongs to, if any.
    #[must_use]
    pub fn collection(&self) -> Option<CollectionId> {
        self.collection
    }
}

impl<E: Clone> EntitySource<'_, E> {
    /// Takes a snapshot of the candidate entities.
    #[must_use]
    pub fn snapshot(&self) -> Vec<E> {
        match self.entities {
            Entities::Slice(entities) => entities.to_vec(),
            Entities::Provider(provider) => provider(),
        }
    }
}

impl<E> Clone for EntitySource<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EntitySource<'_, E> {}

impl<E> Clone for Entities<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Entities<'_, E> {}

impl<E> fmt::Debug for EntitySource<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.entities {
            Entities::Slice(entities) => format!("Slice(len = {})", entities.len()),
            Entities::Provider(_) => "Provider".to_string(),
        };
        f.debug_struct("EntitySource")
            .field("entities", &kind)
            .field("collection", &self.collection)
            .finish()
    }
}

impl<'a, E> From<&'a [E]> for EntitySource<'a, E> {
    fn from(entities: &'a [E]) -> Self {
        Self::slice(entities)
    }
}

impl<'a, E> From<&'a Vec<E>> for EntitySource<'a, E> {
    fn from(entities: &'a Vec<E>) -> Self {
        Self::slice(entities)
    }
}
