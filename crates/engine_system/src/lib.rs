//! # engine_system
//!
//! What a system is, and how it gets executed.
//!
//! A system declares the entity type it works on, narrows a [`Query`] to the
//! entities it cares about, and exposes one of the optional execution
//! capabilities:
//!
//! - [`TickSystem`]: runs once per server tick.
//! - [`SimulateSystem`]: runs once per predicted client input.
//!
//! The [`resolver`] picks the capability once, at registration, and invokes
//! it on every dispatch. Systems that expose neither are reported as
//! unhandled and left to a user fallback.
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::{EntityRecord, Component};
//! use engine_query::{Output, Query};
//! use engine_system::{System, TickSystem};
//!
//! struct Burning;
//! impl Component for Burning {
//!     fn type_name() -> &'static str { "Burning" }
//! }
//!
//! #[derive(Default)]
//! struct BurnSystem {
//!     ticks: u32,
//! }
//!
//! impl System<EntityRecord> for BurnSystem {
//!     fn supports_caching(&self) -> bool { true }
//!
//!     fn filter_entities(&self, query: &mut Query<EntityRecord>) {
//!         query.with_component::<Burning>();
//!     }
//!
//!     fn as_tick(&mut self) -> Option<&mut dyn TickSystem<EntityRecord>> {
//!         Some(self)
//!     }
//! }
//!
//! impl TickSystem<EntityRecord> for BurnSystem {
//!     fn tick(&mut self, entities: Output<'_, EntityRecord>) {
//!         self.ticks += entities.len() as u32;
//!     }
//! }
//! ```
//!
//! [`Query`]: engine_query::Query

pub mod args;
pub mod error;
pub mod realm;
pub mod resolver;
pub mod system;

pub use args::{Arg, ClientId};
pub use error::ExecuteError;
pub use realm::{Realm, RealmAffinity};
pub use resolver::ExecutionMethod;
pub use system::{AsAny, SimulateSystem, System, SystemId, TickSystem};
