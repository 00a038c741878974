//! Lazy component and tag adapters over entity iterators.
//!
//! These are one-shot filters for host code that wants to narrow a sequence
//! without building a query, e.g. `players.iter().with_tags(&["alive"])`.

use crate::component::Component;
use crate::entity::{Entity, EntityExt};

/// Filtering adapters for any iterator whose items are entities.
pub trait EntityIterExt: Iterator + Sized
where
    Self::Item: Entity,
{
    /// Keeps entities that carry at least one of `tags`.
    fn with_any_tags<'t>(self, tags: &'t [&'t str]) -> impl Iterator<Item = Self::Item> + 't
    where
        Self: 't,
    {
        self.filter(move |entity| tags.iter().any(|tag| entity.has_tag(tag)))
    }

    /// Keeps entities that carry every one of `tags`.
    fn with_tags<'t>(self, tags: &'t [&'t str]) -> impl Iterator<Item = Self::Item> + 't
    where
        Self: 't,
    {
        self.filter(move |entity| tags.iter().all(|tag| entity.has_tag(tag)))
    }

    /// Keeps entities that carry none of `tags`.
    fn without_tags<'t>(self, tags: &'t [&'t str]) -> impl Iterator<Item = Self::Item> + 't
    where
        Self: 't,
    {
        self.filter(move |entity| !tags.iter().any(|tag| entity.has_tag(tag)))
    }

    /// Keeps entities that have a component of type `C`.
    fn with_component<C: Component>(self) -> impl Iterator<Item = Self::Item> {
        self.filter(|entity| entity.has_component::<C>())
    }

    /// Keeps entities that have both `A` and `B`.
    fn with_components2<A: Component, B: Component>(self) -> impl Iterator<Item = Self::Item> {
        self.filter(|entity| entity.has_component::<A>() && entity.has_component::<B>())
    }

    /// Keeps entities that do not have a component of type `C`.
    fn without_component<C: Component>(self) -> impl Iterator<Item = Self::Item> {
        self.filter(|entity| !entity.has_component::<C>())
    }
}

impl<I> EntityIterExt for I
where
    I: Iterator,
    I::Item: Entity,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityRecord};

    struct Shield;

    impl Component for Shield {
        fn type_name() -> &'static str {
            "Shield"
        }
    }

    struct Sword;

    impl Component for Sword {
        fn type_name() -> &'static str {
            "Sword"
        }
    }

    fn scene() -> Vec<EntityRecord> {
        vec![
            EntityRecord::new(EntityId(1))
                .with_tags("red alive")
                .with(Shield),
            EntityRecord::new(EntityId(2))
                .with_tags("blue alive")
                .with(Shield)
                .with(Sword),
            EntityRecord::new(EntityId(3)).with_tags("red"),
        ]
    }

    fn ids<'a>(it: impl Iterator<Item = &'a EntityRecord>) -> Vec<u64> {
        it.map(|e| e.id().id()).collect()
    }

    #[test]
    fn test_with_any_tags() {
        let entities = scene();
        assert_eq!(ids(entities.iter().with_any_tags(&["blue", "red"])), vec![1, 2, 3]);
        assert_eq!(ids(entities.iter().with_any_tags(&["green"])), Vec::<u64>::new());
    }

    #[test]
    fn test_with_tags_requires_all() {
        let entities = scene();
        assert_eq!(ids(entities.iter().with_tags(&["red", "alive"])), vec![1]);
        // No tags required: everything passes.
        assert_eq!(ids(entities.iter().with_tags(&[])), vec![1, 2, 3]);
    }

    #[test]
    fn test_without_tags() {
        let entities = scene();
        assert_eq!(ids(entities.iter().without_tags(&["alive"])), vec![3]);
        assert_eq!(ids(entities.iter().without_tags(&[])), vec![1, 2, 3]);
    }

    #[test]
    fn test_component_adapters() {
        let entities = scene();
        assert_eq!(ids(entities.iter().with_component::<Shield>()), vec![1, 2]);
        assert_eq!(ids(entities.iter().with_components2::<Shield, Sword>()), vec![2]);
        assert_eq!(ids(entities.iter().without_component::<Shield>()), vec![3]);
    }
}
