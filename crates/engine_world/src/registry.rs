//! System registry. Tracks registered systems in registration order.
//!
//! Each system is boxed as `Box<dyn System<E>>` and then type-erased so one
//! registry can hold systems over different entity types. The execution
//! method and realm affinity are resolved once, here, and kept in the
//! system's [`SystemInfo`].

use std::any::{Any, TypeId};

use engine_system::{ExecutionMethod, RealmAffinity, System, SystemId};

use crate::error::WorldError;

/// Information about a registered system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// The handle issued at registration.
    pub id: SystemId,
    /// The system's diagnostic name.
    pub name: &'static str,
    /// The concrete system type.
    pub type_id: TypeId,
    /// The entity type the system works on.
    pub entity_type: TypeId,
    /// Name of the entity type, for diagnostics.
    pub entity_type_name: &'static str,
    /// Which realm the system runs in.
    pub affinity: RealmAffinity,
    /// The capability the system is executed through.
    pub method: ExecutionMethod,
}

struct SystemEntry {
    info: SystemInfo,
    /// A `Box<dyn System<E>>` for `E = info.entity_type`.
    system: Box<dyn Any>,
}

/// Registry of all systems known to a world.
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
    next_id: u64,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a system and issue its id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateSystem`] if a system of the same
    /// concrete type is already registered.
    pub fn register<E, S>(&mut self, system: S) -> Result<&SystemInfo, WorldError>
    where
        E: 'static,
        S: System<E>,
    {
        let type_id = TypeId::of::<S>();
        if self.entries.iter().any(|e| e.info.type_id == type_id) {
            return Err(WorldError::DuplicateSystem {
                name: std::any::type_name::<S>(),
            });
        }

        let mut system: Box<dyn System<E>> = Box::new(system);
        let method = ExecutionMethod::resolve(&mut *system);
        let id = SystemId(self.next_id);
        self.next_id += 1;

        let info = SystemInfo {
            id,
            name: system.name(),
            type_id,
            entity_type: TypeId::of::<E>(),
            entity_type_name: std::any::type_name::<E>(),
            affinity: system.affinity(),
            method,
        };
        self.entries.push(SystemEntry {
            info,
            system: Box::new(system),
        });
        let entry = &self.entries[self.entries.len() - 1];
        Ok(&entry.info)
    }

    /// Remove a system from the registry.
    ///
    /// Returns its info if it was found and removed.
    pub fn unregister(&mut self, id: SystemId) -> Option<SystemInfo> {
        let pos = self.entries.iter().position(|e| e.info.id == id)?;
        Some(self.entries.remove(pos).info)
    }

    /// Returns information about a system by id.
    #[must_use]
    pub fn get(&self, id: SystemId) -> Option<&SystemInfo> {
        self.entries.iter().map(|e| &e.info).find(|info| info.id == id)
    }

    /// Returns the id of the registered system of concrete type `S`.
    #[must_use]
    pub fn find<S: Any>(&self) -> Option<SystemId> {
        let type_id = TypeId::of::<S>();
        self.iter().find(|info| info.type_id == type_id).map(|info| info.id)
    }

    /// Returns an iterator over all registered systems in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SystemInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    /// Returns each system's info alongside its type-erased box.
    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&SystemInfo, &mut Box<dyn Any>)> {
        self.entries.iter_mut().map(|e| (&e.info, &mut e.system))
    }

    /// Returns the system registered as `id` if it works on entities of
    /// type `E`.
    #[must_use]
    pub fn system<E: 'static>(&self, id: SystemId) -> Option<&dyn System<E>> {
        let entry = self.entries.iter().find(|e| e.info.id == id)?;
        let system = entry.system.downcast_ref::<Box<dyn System<E>>>()?;
        Some(&**system)
    }

    /// Mutable variant of [`SystemRegistry::system`].
    pub fn system_mut<E: 'static>(&mut self, id: SystemId) -> Option<&mut dyn System<E>> {
        let entry = self.entries.iter_mut().find(|e| e.info.id == id)?;
        let system = entry.system.downcast_mut::<Box<dyn System<E>>>()?;
        Some(&mut **system)
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
