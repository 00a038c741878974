//! The system registry and dispatcher.
//!
//! A [`World`] owns its registered systems and a query cache. Each call to
//! [`World::run`] walks the matching systems in registration order, skips
//! those whose realm does not match, hands each one its (possibly cached)
//! filtered query and executes it through the capability resolved at
//! registration. Systems that no capability handles are passed to the
//! configured fallback resolver and otherwise reported as unhandled.

use std::any::{Any, TypeId};

use engine_query::{CollectionId, EntitySource};
use engine_system::resolver;
use engine_system::{Arg, ExecutionMethod, Realm, System, SystemId};
use tracing::{debug, info, warn};

use crate::cache::{CacheBackend, QueryCache};
use crate::config::{EcsConfig, Logs};
use crate::error::WorldError;
use crate::fallback::Unhandled;
use crate::registry::{SystemInfo, SystemRegistry};

/// Which registered systems a dispatch applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSelector {
    /// Every system over the requested entity type.
    All,
    /// Systems executed through `tick`.
    Tick,
    /// Systems executed through `simulate`.
    Simulate,
    /// The system of one concrete type.
    Only(TypeId),
}

impl SystemSelector {
    /// Selects the system of concrete type `S`.
    #[must_use]
    pub fn only<S: Any>() -> Self {
        Self::Only(TypeId::of::<S>())
    }

    /// Returns `true` if the system described by `info` is selected.
    #[must_use]
    pub fn matches(self, info: &SystemInfo) -> bool {
        match self {
            Self::All => true,
            Self::Tick => info.method == ExecutionMethod::Tick,
            Self::Simulate => info.method == ExecutionMethod::Simulate,
            Self::Only(type_id) => info.type_id == type_id,
        }
    }
}

/// What happened to each selected system during one dispatch.
///
/// Every list is in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Executed through a built-in capability.
    pub executed: Vec<SystemId>,
    /// Handled by the fallback resolver.
    pub fallback: Vec<SystemId>,
    /// Not run because of realm affinity.
    pub skipped: Vec<SystemId>,
    /// Not handled by anything.
    pub unhandled: Vec<SystemId>,
}

impl DispatchReport {
    /// Number of systems that ran, either directly or through the fallback.
    #[must_use]
    pub fn handled(&self) -> usize {
        self.executed.len() + self.fallback.len()
    }
}

/// Registered systems plus their query cache.
///
/// A concrete system type is registered once, over a single entity type,
/// and each registration gets its own [`SystemId`]. Dispatch therefore never
/// asks the cache for a system's query under a different entity type; an
/// entry of another type can only be left behind by driving the cache
/// directly through [`QueryCache::get_or_cache`], in which case the next
/// dispatch evicts it and rebuilds.
#[derive(Debug)]
pub struct World {
    config: EcsConfig,
    registry: SystemRegistry,
    cache: CacheBackend,
    next_collection: u64,
}

impl World {
    /// Create an empty world with a copy of `config`.
    #[must_use]
    pub fn new(config: &EcsConfig) -> Self {
        let config = config.clone();
        let cache = CacheBackend::from_config(&config);
        if config.logging_enabled() {
            debug!(?config, "world created");
        }
        Self {
            config,
            registry: SystemRegistry::new(),
            cache,
            next_collection: 1,
        }
    }

    /// The configuration this world was created with.
    #[must_use]
    pub fn config(&self) -> &EcsConfig {
        &self.config
    }

    /// Register a system over entities of type `E`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateSystem`] if a system of the same
    /// concrete type is already registered.
    pub fn add_system<E, S>(&mut self, system: S) -> Result<SystemId, WorldError>
    where
        E: 'static,
        S: System<E>,
    {
        let info = self.registry.register::<E, S>(system)?;
        if self.config.is_logger_enabled(Logs::SYSTEM_ADDED) {
            info!(
                system = info.name,
                id = %info.id,
                entity = info.entity_type_name,
                method = ?info.method,
                affinity = ?info.affinity,
                "system added"
            );
        }
        Ok(info.id)
    }

    /// Register a default-constructed system.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateSystem`] if a system of type `S` is
    /// already registered.
    pub fn add_default_system<E, S>(&mut self) -> Result<SystemId, WorldError>
    where
        E: 'static,
        S: System<E> + Default,
    {
        self.add_system::<E, S>(S::default())
    }

    /// Remove a system and drop its cached query.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownSystem`] if no system is registered as
    /// `id`.
    pub fn remove_system(&mut self, id: SystemId) -> Result<SystemInfo, WorldError> {
        let info = self
            .registry
            .unregister(id)
            .ok_or(WorldError::UnknownSystem(id))?;
        self.cache.invalidate_for(id);
        if self.config.is_logger_enabled(Logs::SYSTEM_REMOVED) {
            info!(system = info.name, %id, "system removed");
        }
        Ok(info)
    }

    /// Issue a handle for a host-owned entity collection.
    ///
    /// Pass it to [`EntitySource::in_collection`] when dispatching over the
    /// collection, then to [`QueryCache::invalidate_for_collection`] when the
    /// collection changes.
    pub fn register_collection(&mut self) -> CollectionId {
        let id = CollectionId(self.next_collection);
        self.next_collection += 1;
        id
    }

    /// The query cache.
    #[must_use]
    pub fn cache(&self) -> &dyn QueryCache {
        self.cache.as_dyn()
    }

    /// The query cache, for invalidation.
    pub fn cache_mut(&mut self) -> &mut dyn QueryCache {
        self.cache.as_dyn_mut()
    }

    /// The registered systems.
    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.registry
    }

    /// The registered systems, for downcasting.
    pub fn systems_mut(&mut self) -> &mut SystemRegistry {
        &mut self.registry
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.registry.system_count()
    }

    /// Ids of the registered systems in registration order.
    pub fn system_ids(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.registry.iter().map(|info| info.id)
    }

    /// Dispatch the systems chosen by `selector` over `source`.
    ///
    /// `args` are passed through to each system's capability. Simulate
    /// systems require a [`Arg::Client`] first and honour an optional
    /// `Arg::Flag(true)` second argument to run their per-frame variant on
    /// the client.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Execute`] if a selected simulate system is
    /// dispatched without a client argument. Systems before it in
    /// registration order have already run.
    pub fn run<'a, E>(
        &mut self,
        selector: SystemSelector,
        realm: Realm,
        source: impl Into<EntitySource<'a, E>>,
        args: &[Arg],
    ) -> Result<DispatchReport, WorldError>
    where
        E: Clone + 'static,
    {
        let source = source.into();
        let entity_type = TypeId::of::<E>();
        let fallback = self.config.system_resolver().cloned();
        let logging = self.config.logging_enabled();
        let mut report = DispatchReport::default();

        for (info, system) in self.registry.entries_mut() {
            if info.entity_type != entity_type || !selector.matches(info) {
                continue;
            }
            if !info.affinity.allows(realm) {
                if logging {
                    debug!(system = info.name, ?realm, "skipping system outside its realm");
                }
                report.skipped.push(info.id);
                continue;
            }
            let Some(system) = system.downcast_mut::<Box<dyn System<E>>>() else {
                continue;
            };

            let query = self.cache.get_or_cache(info.id, &**system, source);
            if resolver::execute(&mut **system, info.method, query.output(), args, realm)? {
                report.executed.push(info.id);
                continue;
            }

            if let Some(fallback) = &fallback {
                let mut unhandled = Unhandled {
                    id: info.id,
                    name: info.name,
                    system: (**system).as_any_mut(),
                    query: &*query,
                    args,
                    realm,
                };
                if (**fallback)(&mut unhandled) {
                    report.fallback.push(info.id);
                    continue;
                }
            }

            if logging {
                warn!(
                    system = info.name,
                    id = %info.id,
                    "no execution method handled system"
                );
            }
            report.unhandled.push(info.id);
        }

        Ok(report)
    }

    /// Dispatch every system over `source`.
    ///
    /// # Errors
    ///
    /// See [`World::run`].
    pub fn run_all<'a, E>(
        &mut self,
        realm: Realm,
        source: impl Into<EntitySource<'a, E>>,
        args: &[Arg],
    ) -> Result<DispatchReport, WorldError>
    where
        E: Clone + 'static,
    {
        self.run(SystemSelector::All, realm, source, args)
    }

    /// Dispatch only the system of concrete type `S`.
    ///
    /// # Errors
    ///
    /// See [`World::run`].
    pub fn run_only<'a, S, E>(
        &mut self,
        realm: Realm,
        source: impl Into<EntitySource<'a, E>>,
        args: &[Arg],
    ) -> Result<DispatchReport, WorldError>
    where
        S: Any,
        E: Clone + 'static,
    {
        self.run(SystemSelector::only::<S>(), realm, source, args)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(&EcsConfig::default())
    }
}
