//! # engine_component
//!
//! The boundary between the dispatch layer and the host's entity model.
//! Entities and components are owned by the host; this crate only describes
//! how the dispatch layer reads them.
//!
//! This crate provides:
//!
//! - [`Component`] trait: marker for data that can be attached to an entity.
//! - [`ComponentSet`]: a type-keyed component container hosts can embed.
//! - [`Entity`] trait: read-only component and tag lookup.
//! - [`EntityExt`]: typed helpers on top of [`Entity`].
//! - [`EntityIterExt`]: component/tag adapters over entity iterators.
//! - [`EntityRecord`]: a ready-made host entity.
//! - [`tags`]: space-delimited tag list helpers.

pub mod component;
pub mod entity;
pub mod iter;
pub mod tags;

pub use component::{Component, ComponentSet};
pub use entity::{Entity, EntityExt, EntityId, EntityRecord};
pub use iter::EntityIterExt;
