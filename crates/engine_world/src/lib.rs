//! # engine_world
//!
//! The dispatch side of the engine: a [`World`] owns registered systems,
//! caches each system's filtered query and runs the systems over
//! host-supplied entities.
//!
//! This crate provides:
//!
//! - [`World`]: registration, realm gating and dispatch.
//! - [`QueryCache`] with the [`MemoryQueryCache`] and [`FakeQueryCache`]
//!   backends.
//! - [`EcsConfig`] and the [`Logs`] diagnostic mask.
//! - [`Unhandled`], the context given to a user fallback for systems with
//!   no built-in capability.
//!
//! ## Usage
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use engine_component::{EntityId, EntityRecord};
//! use engine_query::{Output, Query};
//! use engine_system::{Realm, System, TickSystem};
//! use engine_world::{EcsConfig, World};
//!
//! #[derive(Default)]
//! struct Counter(usize);
//!
//! impl System<Rc<EntityRecord>> for Counter {
//!     fn supports_caching(&self) -> bool { true }
//!
//!     fn filter_entities(&self, query: &mut Query<Rc<EntityRecord>>) {
//!         query.with_tag("npc");
//!     }
//!
//!     fn as_tick(&mut self) -> Option<&mut dyn TickSystem<Rc<EntityRecord>>> {
//!         Some(self)
//!     }
//! }
//!
//! impl TickSystem<Rc<EntityRecord>> for Counter {
//!     fn tick(&mut self, entities: Output<'_, Rc<EntityRecord>>) {
//!         self.0 += entities.len();
//!     }
//! }
//!
//! let mut world = World::new(&EcsConfig::default());
//! let counter = world.add_default_system::<Rc<EntityRecord>, Counter>().unwrap();
//!
//! let entities = vec![
//!     Rc::new(EntityRecord::new(EntityId(1)).with_tags("npc")),
//!     Rc::new(EntityRecord::new(EntityId(2)).with_tags("player")),
//! ];
//! let report = world.run_all(Realm::SERVER, &entities, &[]).unwrap();
//! assert_eq!(report.executed, vec![counter]);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod registry;
pub mod world;

pub use cache::{CacheBackend, FakeQueryCache, MemoryQueryCache, QueryCache};
pub use config::{EcsConfig, Logs, SystemResolver};
pub use error::{ConfigError, WorldError};
pub use fallback::Unhandled;
pub use registry::{SystemInfo, SystemRegistry};
pub use world::{DispatchReport, SystemSelector, World};
