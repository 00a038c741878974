//! Linear and angular velocity.

use std::cell::Cell;

use engine_component::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Velocity of a moving entity.
///
/// `base` is the velocity of whatever the entity stands on; it is added to
/// the entity's own velocity by [`Velocity::effective`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    linear: Cell<Vec3>,
    local: Cell<Vec3>,
    angular: Cell<Vec3>,
    base: Cell<Vec3>,
}

impl Velocity {
    /// Create a velocity component moving at `linear`.
    #[must_use]
    pub fn new(linear: Vec3) -> Self {
        Self {
            linear: Cell::new(linear),
            ..Self::default()
        }
    }

    /// World-space velocity.
    #[must_use]
    pub fn linear(&self) -> Vec3 {
        self.linear.get()
    }

    pub fn set_linear(&self, linear: Vec3) {
        self.linear.set(linear);
    }

    /// Velocity relative to the entity's own orientation.
    #[must_use]
    pub fn local(&self) -> Vec3 {
        self.local.get()
    }

    pub fn set_local(&self, local: Vec3) {
        self.local.set(local);
    }

    /// Angular velocity as pitch, yaw and roll rates in radians per second.
    #[must_use]
    pub fn angular(&self) -> Vec3 {
        self.angular.get()
    }

    pub fn set_angular(&self, angular: Vec3) {
        self.angular.set(angular);
    }

    /// Velocity of the ground the entity stands on.
    #[must_use]
    pub fn base(&self) -> Vec3 {
        self.base.get()
    }

    pub fn set_base(&self, base: Vec3) {
        self.base.set(base);
    }

    /// `linear + base`.
    #[must_use]
    pub fn effective(&self) -> Vec3 {
        self.linear() + self.base()
    }

    /// Displacement over `dt` seconds at the effective velocity.
    #[must_use]
    pub fn displacement(&self, dt: f32) -> Vec3 {
        self.effective() * dt
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_includes_base() {
        let v = Velocity::new(Vec3::X);
        v.set_base(Vec3::Z);
        assert_eq!(v.effective(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(v.displacement(0.5), Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_defaults_to_rest() {
        let v = Velocity::default();
        assert_eq!(v.linear(), Vec3::ZERO);
        assert_eq!(v.angular(), Vec3::ZERO);
        v.set_angular(Vec3::Y);
        v.set_local(Vec3::X);
        assert_eq!(v.angular(), Vec3::Y);
        assert_eq!(v.local(), Vec3::X);
        assert_eq!(v.effective(), Vec3::ZERO);
    }
}
