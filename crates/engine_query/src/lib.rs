//! # engine_query
//!
//! Filterable views over entity snapshots.
//!
//! A [`Query`] captures a sequence of entities once, then narrows it with
//! chained component and tag filters. Filtering only ever excludes entities,
//! so the order of filter calls never changes the result. [`Query::reset`]
//! restores the unfiltered view without taking a new snapshot.
//!
//! [`EntitySource`] describes where a query's snapshot comes from, and
//! optionally tags it with the [`CollectionId`] of a host collection so cached
//! queries built over that collection can be invalidated together.

pub mod query;
pub mod source;

pub use query::{Output, Query};
pub use source::{CollectionId, EntitySource};
