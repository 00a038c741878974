//! Per-system query caching.
//!
//! A system that reports [`System::supports_caching`] has its filtered
//! [`Query`] built once and then shared on every later dispatch until the
//! entry is invalidated. Cached queries are replayed verbatim: the snapshot
//! is not retaken, so hosts must invalidate when their entities change.
//!
//! Two backends implement [`QueryCache`]:
//!
//! - [`MemoryQueryCache`] keeps one entry per system.
//! - [`FakeQueryCache`] never stores anything and is used when caching is
//!   disabled.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use engine_query::{CollectionId, EntitySource, Query};
use engine_system::{System, SystemId};
use tracing::{debug, warn};

use crate::config::{EcsConfig, Logs};

/// Caches filtered queries keyed by system.
pub trait QueryCache {
    /// Returns the query for `system`, building and filtering it from
    /// `source` if no matching entry exists.
    ///
    /// The result is stored only if the system supports caching.
    fn get_or_cache<E: Clone + 'static>(
        &mut self,
        id: SystemId,
        system: &dyn System<E>,
        source: EntitySource<'_, E>,
    ) -> Rc<Query<E>>
    where
        Self: Sized;

    /// Drops every entry.
    fn invalidate(&mut self);

    /// Drops the entry for one system. Does nothing if there is none.
    fn invalidate_for(&mut self, id: SystemId);

    /// Drops every entry whose snapshot was taken from `collection`.
    fn invalidate_for_collection(&mut self, collection: CollectionId);

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if an entry is stored for `id`.
    fn contains(&self, id: SystemId) -> bool;
}

fn build<E: Clone + 'static>(system: &dyn System<E>, source: EntitySource<'_, E>) -> Query<E> {
    let mut query = Query::from_source(source);
    system.filter_entities(&mut query);
    query
}

struct CacheEntry {
    query: Rc<dyn Any>,
    entity_type: TypeId,
    entity_type_name: &'static str,
    collection: Option<CollectionId>,
}

/// In-memory cache holding at most one query per system.
#[derive(Default)]
pub struct MemoryQueryCache {
    entries: HashMap<SystemId, CacheEntry>,
    log_cache_misses: bool,
    log_inserts: bool,
}

impl MemoryQueryCache {
    /// Create an empty cache.
    ///
    /// `log_cache_misses` controls the warning emitted when an entry built
    /// for another entity type is evicted.
    #[must_use]
    pub fn new(log_cache_misses: bool) -> Self {
        Self {
            entries: HashMap::new(),
            log_cache_misses,
            log_inserts: false,
        }
    }

    /// Enable or disable the debug event emitted when a query is stored.
    #[must_use]
    pub fn with_insert_logging(mut self, enabled: bool) -> Self {
        self.log_inserts = enabled;
        self
    }

    /// Returns the ids of all systems with a stored query.
    pub fn system_ids(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.entries.keys().copied()
    }
}

impl QueryCache for MemoryQueryCache {
    fn get_or_cache<E: Clone + 'static>(
        &mut self,
        id: SystemId,
        system: &dyn System<E>,
        source: EntitySource<'_, E>,
    ) -> Rc<Query<E>> {
        if let Some(entry) = self.entries.get(&id) {
            if entry.entity_type == TypeId::of::<E>() {
                if let Ok(query) = Rc::clone(&entry.query).downcast::<Query<E>>() {
                    return query;
                }
            }
            if self.log_cache_misses {
                warn!(
                    system = system.name(),
                    %id,
                    cached = entry.entity_type_name,
                    requested = std::any::type_name::<E>(),
                    "cached query has a different entity type, rebuilding"
                );
            }
            self.entries.remove(&id);
        }

        let collection = source.collection();
        let query = Rc::new(build(system, source));
        if system.supports_caching() {
            if self.log_inserts {
                debug!(system = system.name(), %id, entities = query.len(), "caching query");
            }
            self.entries.insert(
                id,
                CacheEntry {
                    query: Rc::clone(&query) as Rc<dyn Any>,
                    entity_type: TypeId::of::<E>(),
                    entity_type_name: std::any::type_name::<E>(),
                    collection,
                },
            );
        }
        query
    }

    fn invalidate(&mut self) {
        self.entries.clear();
    }

    fn invalidate_for(&mut self, id: SystemId) {
        self.entries.remove(&id);
    }

    fn invalidate_for_collection(&mut self, collection: CollectionId) {
        self.entries
            .retain(|_, entry| entry.collection != Some(collection));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, id: SystemId) -> bool {
        self.entries.contains_key(&id)
    }
}

impl std::fmt::Debug for MemoryQueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (id, entry) in &self.entries {
            map.entry(id, &(entry.entity_type_name, entry.entity_type, entry.collection));
        }
        map.finish()
    }
}

/// A cache that stores nothing: every lookup builds a fresh query.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeQueryCache;

impl QueryCache for FakeQueryCache {
    fn get_or_cache<E: Clone + 'static>(
        &mut self,
        _id: SystemId,
        system: &dyn System<E>,
        source: EntitySource<'_, E>,
    ) -> Rc<Query<E>> {
        Rc::new(build(system, source))
    }

    fn invalidate(&mut self) {}

    fn invalidate_for(&mut self, _id: SystemId) {}

    fn invalidate_for_collection(&mut self, _collection: CollectionId) {}

    fn len(&self) -> usize {
        0
    }

    fn contains(&self, _id: SystemId) -> bool {
        false
    }
}

/// The cache backend chosen when a world is created.
#[derive(Debug)]
pub enum CacheBackend {
    /// Queries are cached.
    Memory(MemoryQueryCache),
    /// Caching is disabled.
    Fake(FakeQueryCache),
}

impl CacheBackend {
    /// Selects the backend for `config`.
    #[must_use]
    pub fn from_config(config: &EcsConfig) -> Self {
        if config.use_caching() {
            let cache = MemoryQueryCache::new(config.is_logger_enabled(Logs::UNEXPECTED_CACHE_MISS))
                .with_insert_logging(config.logging_enabled());
            Self::Memory(cache)
        } else {
            Self::Fake(FakeQueryCache)
        }
    }

    /// Returns the backend as a trait object.
    pub fn as_dyn(&self) -> &dyn QueryCache {
        match self {
            Self::Memory(cache) => cache,
            Self::Fake(cache) => cache,
        }
    }

    /// Returns the backend as a mutable trait object.
    pub fn as_dyn_mut(&mut self) -> &mut dyn QueryCache {
        match self {
            Self::Memory(cache) => cache,
            Self::Fake(cache) => cache,
        }
    }
}

impl QueryCache for CacheBackend {
    fn get_or_cache<E: Clone + 'static>(
        &mut self,
        id: SystemId,
        system: &dyn System<E>,
        source: EntitySource<'_, E>,
    ) -> Rc<Query<E>> {
        match self {
            Self::Memory(cache) => cache.get_or_cache(id, system, source),
            Self::Fake(cache) => cache.get_or_cache(id, system, source),
        }
    }

    fn invalidate(&mut self) {
        self.as_dyn_mut().invalidate();
    }

    fn invalidate_for(&mut self, id: SystemId) {
        self.as_dyn_mut().invalidate_for(id);
    }

    fn invalidate_for_collection(&mut self, collection: CollectionId) {
        self.as_dyn_mut().invalidate_for_collection(collection);
    }

    fn len(&self) -> usize {
        self.as_dyn().len()
    }

    fn contains(&self, id: SystemId) -> bool {
        self.as_dyn().contains(id)
    }
}
