//! The [`Query`] type and its output iterator.
//!
//! A query owns a snapshot of entities and an exclusion mask with one slot per
//! snapshot element. Every filter is a single pass over the elements that are
//! not yet excluded; an excluded element is never tested again, so filters are
//! monotonic for the lifetime of the query.

use std::fmt;
use std::iter::FusedIterator;

use engine_component::{Component, Entity, EntityExt};

use crate::source::{CollectionId, EntitySource};

/// An order-preserving, filterable view over a snapshot of entities.
pub struct Query<E> {
    /// The snapshot taken at construction.
    entities: Vec<E>,
    /// `true` marks an excluded element. Always `entities.len()` long.
    excluded: Vec<bool>,
    /// Number of elements not excluded.
    remaining: usize,
    /// The registered collection the snapshot was taken from, if any.
    collection: Option<CollectionId>,
}

impl<E> Query<E> {
    /// Create a query over the given entities.
    #[must_use]
    pub fn from_entities(entities: impl IntoIterator<Item = E>) -> Self {
        Self::from_snapshot(entities.into_iter().collect(), None)
    }

    /// Create a query by calling `provider` once for the snapshot.
    ///
    /// The provider is not called again, not even by [`Query::reset`].
    #[must_use]
    pub fn from_provider(provider: impl FnOnce() -> Vec<E>) -> Self {
        Self::from_snapshot(provider(), None)
    }

    fn from_snapshot(entities: Vec<E>, collection: Option<CollectionId>) -> Self {
        let len = entities.len();
        Self {
            entities,
            excluded: vec![false; len],
            remaining: len,
            collection,
        }
    }

    /// Clears every filter without taking a new snapshot.
    pub fn reset(&mut self) -> &mut Self {
        self.excluded.fill(false);
        self.remaining = self.entities.len();
        self
    }

    /// Iterates, in snapshot order, over the entities that passed every filter.
    #[must_use]
    pub fn output(&self) -> Output<'_, E> {
        Output {
            entities: &self.entities,
            excluded: &self.excluded,
            front: 0,
            remaining: self.remaining,
        }
    }

    /// Number of entities that passed every filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remaining
    }

    /// Returns `true` if no entity passed the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Number of entities in the snapshot, filtered or not.
    #[must_use]
    pub fn snapshot_len(&self) -> usize {
        self.entities.len()
    }

    /// The registered collection the snapshot was taken from, if any.
    #[must_use]
    pub fn collection(&self) -> Option<CollectionId> {
        self.collection
    }

    /// Excludes every remaining entity for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) -> &mut Self {
        debug_assert_eq!(self.entities.len(), self.excluded.len());
        for (entity, excluded) in self.entities.iter().zip(self.excluded.iter_mut()) {
            if *excluded {
                continue;
            }
            if !keep(entity) {
                *excluded = true;
                self.remaining -= 1;
            }
        }
        self
    }
}

impl<E: Clone> Query<E> {
    /// Create a query from a source, remembering its collection.
    #[must_use]
    pub fn from_source(source: EntitySource<'_, E>) -> Self {
        Self::from_snapshot(source.snapshot(), source.collection())
    }
}

impl<E: Entity> Query<E> {
    /// Keeps entities that have a component of type `C`.
    pub fn with_component<C: Component>(&mut self) -> &mut Self {
        self.retain(|entity| entity.has_component::<C>())
    }

    /// Keeps entities that have a component of type `C` accepted by `predicate`.
    pub fn with_component_where<C: Component>(
        &mut self,
        mut predicate: impl FnMut(&C) -> bool,
    ) -> &mut Self {
        self.retain(|entity| entity.component::<C>().is_some_and(&mut predicate))
    }

    /// Keeps entities that do not have a component of type `C`.
    pub fn without_component<C: Component>(&mut self) -> &mut Self {
        self.retain(|entity| !entity.has_component::<C>())
    }

    /// Keeps entities tagged with `tag`.
    pub fn with_tag(&mut self, tag: &str) -> &mut Self {
        self.retain(|entity| entity.has_tag(tag))
    }

    /// Keeps entities not tagged with `tag`.
    pub fn without_tag(&mut self, tag: &str) -> &mut Self {
        self.retain(|entity| !entity.has_tag(tag))
    }
}

impl<E: Clone> Clone for Query<E> {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities.clone(),
            excluded: self.excluded.clone(),
            remaining: self.remaining,
            collection: self.collection,
        }
    }
}

impl<E> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("snapshot_len", &self.entities.len())
            .field("len", &self.remaining)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Iterator over the entities of a [`Query`] that passed every filter.
pub struct Output<'q, E> {
    entities: &'q [E],
    excluded: &'q [bool],
    front: usize,
    remaining: usize,
}

impl<'q, E> Iterator for Output<'q, E> {
    type Item = &'q E;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.entities.len() {
            let index = self.front;
            self.front += 1;
            if !self.excluded[index] {
                self.remaining -= 1;
                return Some(&self.entities[index]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for Output<'_, E> {}

impl<E> FusedIterator for Output<'_, E> {}

impl<E> Clone for Output<'_, E> {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities,
            excluded: self.excluded,
            front: self.front,
            remaining: self.remaining,
        }
    }
}

impl<E> fmt::Debug for Output<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use engine_component::{EntityId, EntityRecord};

    use super::*;

    struct Armed;

    impl Component for Armed {
        fn type_name() -> &'static str {
            "Armed"
        }
    }

    struct Health(u32);

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    fn ids<E: std::ops::Deref<Target = EntityRecord>>(query: &Query<E>) -> Vec<u64> {
        query.output().map(|e| e.id().id()).collect()
    }

    fn red_blue_red() -> Vec<std::rc::Rc<EntityRecord>> {
        vec![
            std::rc::Rc::new(EntityRecord::new(EntityId(1)).with_tags("red")),
            std::rc::Rc::new(EntityRecord::new(EntityId(2)).with_tags("blue")),
            std::rc::Rc::new(
                EntityRecord::new(EntityId(3))
                    .with_tags("red")
                    .with(Armed),
            ),
        ]
    }

    #[test]
    fn test_unfiltered_output_is_snapshot() {
        let query = Query::from_entities(red_blue_red());
        assert_eq!(ids(&query), vec![1, 2, 3]);
        assert_eq!(query.len(), 3);
        assert_eq!(query.snapshot_len(), 3);
    }

    #[test]
    fn test_tag_then_component_scenario() {
        let mut query = Query::from_entities(red_blue_red());
        query.with_tag("red");
        assert_eq!(ids(&query), vec![1, 3]);
        query.without_component::<Armed>();
        assert_eq!(ids(&query), vec![1]);
    }

    #[test]
    fn test_filters_commute() {
        let mut a = Query::from_entities(red_blue_red());
        a.with_tag("red").without_component::<Armed>();
        let mut b = Query::from_entities(red_blue_red());
        b.without_component::<Armed>().with_tag("red");
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_filters_are_idempotent() {
        let mut query = Query::from_entities(red_blue_red());
        query.with_tag("red");
        let once = ids(&query);
        query.with_tag("red");
        assert_eq!(ids(&query), once);
    }

    #[test]
    fn test_excluded_entities_never_retested() {
        let tested = Cell::new(0);
        let mut query = Query::from_entities(red_blue_red());
        query.with_tag("blue");
        query.retain(|_| {
            tested.set(tested.get() + 1);
            true
        });
        assert_eq!(tested.get(), 1);
    }

    #[test]
    fn test_with_component_predicate() {
        let entities = vec![
            EntityRecord::new(EntityId(1)).with(Health(0)),
            EntityRecord::new(EntityId(2)).with(Health(50)),
            EntityRecord::new(EntityId(3)),
        ];
        let mut query = Query::from_entities(entities.iter());
        query.with_component_where::<Health>(|h| h.0 > 0);
        let kept: Vec<u64> = query.output().map(|e| e.id().id()).collect();
        assert_eq!(kept, vec![2]);
    }

    #[test]
    fn test_with_component() {
        let mut query = Query::from_entities(red_blue_red());
        query.with_component::<Armed>();
        assert_eq!(ids(&query), vec![3]);
    }

    #[test]
    fn test_without_tag() {
        let mut query = Query::from_entities(red_blue_red());
        query.without_tag("red");
        assert_eq!(ids(&query), vec![2]);
    }

    #[test]
    fn test_reset_restores_without_reinvoking_provider() {
        let calls = Cell::new(0);
        let mut query = Query::from_provider(|| {
            calls.set(calls.get() + 1);
            red_blue_red()
        });
        query.with_tag("red").with_component::<Armed>();
        assert_eq!(ids(&query), vec![3]);

        query.reset();
        assert_eq!(ids(&query), vec![1, 2, 3]);
        assert_eq!(query.len(), 3);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let mut query: Query<EntityRecord> = Query::from_entities(Vec::new());
        query.with_tag("red").without_component::<Armed>().reset();
        assert!(query.is_empty());
        assert_eq!(query.output().count(), 0);
    }

    #[test]
    fn test_output_is_exact_size_and_cloneable() {
        let mut query = Query::from_entities(red_blue_red());
        query.with_tag("red");
        let mut out = query.output();
        assert_eq!(out.len(), 2);
        out.next();
        let copy = out.clone();
        assert_eq!(out.len(), 1);
        assert_eq!(copy.count(), 1);
    }

    #[test]
    fn test_from_source_keeps_collection() {
        let entities = red_blue_red();
        let source = EntitySource::from(&entities).in_collection(CollectionId(9));
        let query = Query::from_source(source);
        assert_eq!(query.collection(), Some(CollectionId(9)));
        assert_eq!(query.snapshot_len(), 3);
    }
}
