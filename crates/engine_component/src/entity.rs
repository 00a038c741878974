//! The [`Entity`] boundary trait and a reference host entity.
//!
//! The dispatch layer never owns entities. It reads them through [`Entity`],
//! which hosts implement for whatever handle type they hand to systems
//! (`Rc<Player>`, `&Enemy`, an id wrapper, ...).

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::component::{Component, ComponentSet};
use crate::tags;

/// Read-only view of a host entity.
pub trait Entity {
    /// Type-erased component lookup.
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any>;

    /// The entity's space-delimited tag list.
    fn tag_list(&self) -> &str;
}

/// Typed helpers available on every [`Entity`].
pub trait EntityExt: Entity {
    /// Returns the component of type `C`, if attached.
    fn component<C: Component>(&self) -> Option<&C> {
        self.component_by_type(TypeId::of::<C>())
            .and_then(|value| value.downcast_ref::<C>())
    }

    /// Returns `true` if a component of type `C` is attached.
    fn has_component<C: Component>(&self) -> bool {
        self.component::<C>().is_some()
    }

    /// Returns `true` if `tag` is one of the entity's tags.
    fn has_tag(&self, tag: &str) -> bool {
        tags::has_tag(self.tag_list(), tag)
    }

    /// Returns both components if both are attached.
    fn components2<A: Component, B: Component>(&self) -> Option<(&A, &B)> {
        Some((self.component::<A>()?, self.component::<B>()?))
    }

    /// Returns all three components if all are attached.
    fn components3<A: Component, B: Component, C: Component>(&self) -> Option<(&A, &B, &C)> {
        Some((
            self.component::<A>()?,
            self.component::<B>()?,
            self.component::<C>()?,
        ))
    }
}

impl<T: Entity + ?Sized> EntityExt for T {}

impl<T: Entity + ?Sized> Entity for &T {
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        (**self).component_by_type(type_id)
    }

    fn tag_list(&self) -> &str {
        (**self).tag_list()
    }
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        (**self).component_by_type(type_id)
    }

    fn tag_list(&self) -> &str {
        (**self).tag_list()
    }
}

impl<T: Entity + ?Sized> Entity for Rc<T> {
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        (**self).component_by_type(type_id)
    }

    fn tag_list(&self) -> &str {
        (**self).tag_list()
    }
}

impl<T: Entity + ?Sized> Entity for Arc<T> {
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        (**self).component_by_type(type_id)
    }

    fn tag_list(&self) -> &str {
        (**self).tag_list()
    }
}

/// A host-assigned entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create an entity id from a raw `u64`.
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

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A simple host entity: an id, a component set and a tag list.
///
/// Hosts with their own entity storage implement [`Entity`] directly instead.
#[derive(Debug)]
pub struct EntityRecord {
    id: EntityId,
    components: ComponentSet,
    tags: String,
}

impl EntityRecord {
    /// Create an entity with no components and no tags.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            components: ComponentSet::new(),
            tags: String::new(),
        }
    }

    /// Attach a component.
    #[must_use]
    pub fn with<C: Component>(mut self, component: C) -> Self {
        self.components.insert(component);
        self
    }

    /// Replace the tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the component set.
    #[must_use]
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Returns the component set mutably.
    pub fn components_mut(&mut self) -> &mut ComponentSet {
        &mut self.components
    }

    /// Adds a tag. Returns `true` if it was not already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        tags::insert(&mut self.tags, tag)
    }

    /// Removes a tag. Returns `true` if it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        tags::remove(&mut self.tags, tag)
    }
}

impl Entity for EntityRecord {
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        self.components.get_by_type(type_id)
    }

    fn tag_list(&self) -> &str {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position(f32);

    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    struct Velocity(f32);

    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    struct Frozen;

    impl Component for Frozen {
        fn type_name() -> &'static str {
            "Frozen"
        }
    }

    #[test]
    fn test_record_component_lookup() {
        let e = EntityRecord::new(EntityId(1)).with(Position(2.0));
        assert!(e.has_component::<Position>());
        assert!(!e.has_component::<Velocity>());
        assert_eq!(e.component::<Position>().map(|p| p.0), Some(2.0));
    }

    #[test]
    fn test_record_tags() {
        let mut e = EntityRecord::new(EntityId(1)).with_tags("red team_a");
        assert!(e.has_tag("red"));
        assert!(!e.has_tag("team"));
        assert!(e.add_tag("boss"));
        assert!(e.remove_tag("red"));
        assert_eq!(e.tag_list(), "team_a boss");
    }

    #[test]
    fn test_components2_and_3() {
        let e = EntityRecord::new(EntityId(1))
            .with(Position(1.0))
            .with(Velocity(3.0));
        let (p, v) = e.components2::<Position, Velocity>().unwrap();
        assert_eq!((p.0, v.0), (1.0, 3.0));
        assert!(e.components3::<Position, Velocity, Frozen>().is_none());
    }

    #[test]
    fn test_handle_impls_forward() {
        let e = Rc::new(EntityRecord::new(EntityId(7)).with_tags("npc"));
        assert!(e.has_tag("npc"));
        let by_ref: &EntityRecord = &e;
        assert!(by_ref.has_tag("npc"));
        let boxed: Box<dyn Entity> = Box::new(EntityRecord::new(EntityId(8)).with(Frozen));
        assert!(boxed.has_component::<Frozen>());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::from_raw(42).to_string(), "Entity(42)");
        assert_eq!(EntityId(3).id(), 3);
    }
}
