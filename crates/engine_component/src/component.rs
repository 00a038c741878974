//! Core [`Component`] trait and a type-keyed component container.
//!
//! Components are plain Rust types. Lookup is keyed by [`TypeId`], so at most
//! one instance of each component type can be attached to an entity.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// The core component trait.
///
/// Anything attached to an entity must implement this trait. Components are
/// `'static` so they can be looked up by [`TypeId`] and downcast.
///
/// # Examples
///
/// ```rust
/// use engine_component::Component;
///
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Any {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str
    where
        Self: Sized;
}

struct Slot {
    name: &'static str,
    value: Box<dyn Any>,
}

/// A set of components keyed by component type.
#[derive(Default)]
pub struct ComponentSet {
    slots: HashMap<TypeId, Slot>,
}

impl ComponentSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Attach a component, returning the previous instance of the same type.
    pub fn insert<C: Component>(&mut self, component: C) -> Option<Box<dyn Any>> {
        self.slots
            .insert(
                TypeId::of::<C>(),
                Slot {
                    name: C::type_name(),
                    value: Box::new(component),
                },
            )
            .map(|slot| slot.value)
    }

    /// Detach a component. Returns `None` if it was not attached.
    pub fn remove<C: Component>(&mut self) -> Option<C> {
        let slot = self.slots.remove(&TypeId::of::<C>())?;
        slot.value.downcast::<C>().ok().map(|boxed| *boxed)
    }

    /// Returns the component of type `C`, if attached.
    #[must_use]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.get_by_type(TypeId::of::<C>())
            .and_then(|value| value.downcast_ref::<C>())
    }

    /// Returns a mutable reference to the component of type `C`, if attached.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.slots
            .get_mut(&TypeId::of::<C>())
            .and_then(|slot| slot.value.downcast_mut::<C>())
    }

    /// Type-erased lookup.
    #[must_use]
    pub fn get_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        self.slots.get(&type_id).map(|slot| slot.value.as_ref())
    }

    /// Returns `true` if a component of type `C` is attached.
    #[must_use]
    pub fn contains<C: Component>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<C>())
    }

    /// Returns the number of attached components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no components are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the names of all attached component types, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slots.values().map(|slot| slot.name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, PartialEq)]
    struct Armor(u32);

    impl Component for Armor {
        fn type_name() -> &'static str {
            "Armor"
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = ComponentSet::new();
        set.insert(Health {
            current: 80.0,
            max: 100.0,
        });
        assert!(set.contains::<Health>());
        assert!(!set.contains::<Armor>());
        assert_eq!(set.get::<Health>().map(|h| h.current), Some(80.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_replaces_same_type() {
        let mut set = ComponentSet::new();
        assert!(set.insert(Armor(1)).is_none());
        assert!(set.insert(Armor(2)).is_some());
        assert_eq!(set.len(), 1);
        assert_eq!(set.get::<Armor>(), Some(&Armor(2)));
    }

    #[test]
    fn test_remove() {
        let mut set = ComponentSet::new();
        set.insert(Armor(5));
        assert_eq!(set.remove::<Armor>(), Some(Armor(5)));
        assert!(set.is_empty());
        assert_eq!(set.remove::<Armor>(), None);
    }

    #[test]
    fn test_get_mut() {
        let mut set = ComponentSet::new();
        set.insert(Health {
            current: 10.0,
            max: 100.0,
        });
        if let Some(health) = set.get_mut::<Health>() {
            health.current = health.max;
        }
        assert_eq!(set.get::<Health>().map(|h| h.current), Some(100.0));
    }

    #[test]
    fn test_names_sorted() {
        let mut set = ComponentSet::new();
        set.insert(Health {
            current: 1.0,
            max: 1.0,
        });
        set.insert(Armor(0));
        assert_eq!(set.names(), vec!["Armor", "Health"]);
    }
}
