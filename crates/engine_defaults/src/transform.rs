//! Spatial components.
//!
//! [`Position`], [`Rotation`] and [`Scale`] each carry one property;
//! [`Transform`] carries all three. Systems that only care about one
//! property can go through the [`HasPosition`], [`HasRotation`] and
//! [`HasScale`] traits and accept either.
//!
//! Properties live in [`Cell`]s so a system can write them through the
//! shared entity references it receives from a query.

use std::cell::Cell;

use engine_component::Component;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Read/write access to a world-space position.
pub trait HasPosition {
    /// The current position.
    fn position(&self) -> Vec3;

    /// Replace the position.
    fn set_position(&self, position: Vec3);

    /// Move by `offset`.
    fn translate(&self, offset: Vec3) {
        self.set_position(self.position() + offset);
    }
}

/// Read/write access to a rotation.
pub trait HasRotation {
    /// The current rotation.
    fn rotation(&self) -> Quat;

    /// Replace the rotation.
    fn set_rotation(&self, rotation: Quat);

    /// Apply `rotation` on top of the current one.
    fn rotate(&self, rotation: Quat) {
        self.set_rotation(rotation * self.rotation());
    }
}

/// Read/write access to a uniform scale.
pub trait HasScale {
    /// The current scale factor.
    fn scale(&self) -> f32;

    /// Replace the scale factor.
    fn set_scale(&self, scale: f32);
}

/// A world-space position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(Cell<Vec3>);

impl Position {
    /// Create a position component.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self(Cell::new(position))
    }
}

impl HasPosition for Position {
    fn position(&self) -> Vec3 {
        self.0.get()
    }

    fn set_position(&self, position: Vec3) {
        self.0.set(position);
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// A rotation as a unit quaternion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation(Cell<Quat>);

impl Rotation {
    /// Create a rotation component.
    #[must_use]
    pub fn new(rotation: Quat) -> Self {
        Self(Cell::new(rotation))
    }
}

impl HasRotation for Rotation {
    fn rotation(&self) -> Quat {
        self.0.get()
    }

    fn set_rotation(&self, rotation: Quat) {
        self.0.set(rotation);
    }
}

impl Component for Rotation {
    fn type_name() -> &'static str {
        "Rotation"
    }
}

/// A uniform scale factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale(Cell<f32>);

impl Scale {
    /// Create a scale component.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self(Cell::new(scale))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl HasScale for Scale {
    fn scale(&self) -> f32 {
        self.0.get()
    }

    fn set_scale(&self, scale: f32) {
        self.0.set(scale);
    }
}

impl Component for Scale {
    fn type_name() -> &'static str {
        "Scale"
    }
}

/// Position, rotation and uniform scale together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    position: Cell<Vec3>,
    rotation: Cell<Quat>,
    scale: Cell<f32>,
}

impl Transform {
    /// Create a transform at the origin with no rotation and unit scale.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_position(Vec3::ZERO)
    }

    /// Create a transform at `position` with no rotation and unit scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::from_position_rotation(position, Quat::IDENTITY)
    }

    /// Create a transform with position and rotation.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: Cell::new(position),
            rotation: Cell::new(rotation),
            scale: Cell::new(1.0),
        }
    }

    /// Set the scale factor.
    #[must_use]
    pub fn with_scale(self, scale: f32) -> Self {
        self.scale.set(scale);
        self
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale.get()),
            self.rotation.get(),
            self.position.get(),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl HasPosition for Transform {
    fn position(&self) -> Vec3 {
        self.position.get()
    }

    fn set_position(&self, position: Vec3) {
        self.position.set(position);
    }
}

impl HasRotation for Transform {
    fn rotation(&self) -> Quat {
        self.rotation.get()
    }

    fn set_rotation(&self, rotation: Quat) {
        self.rotation.set(rotation);
    }
}

impl HasScale for Transform {
    fn scale(&self) -> f32 {
        self.scale.get()
    }

    fn set_scale(&self, scale: f32) {
        self.scale.set(scale);
    }
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}
