//! # engine_defaults
//!
//! Components most hosts need, built on [`glam`].
//!
//! This crate provides:
//!
//! - [`Position`], [`Rotation`], [`Scale`] and the composite [`Transform`].
//! - [`Velocity`].
//! - [`Model`], an asset path plus render colour.
//! - [`Client`], which marks an entity as owned by a connected client.
//!
//! Every property uses interior mutability, so systems update components
//! through the shared references their queries hand out.

pub mod client;
pub mod model;
pub mod transform;
pub mod velocity;

// Re-export glam types for convenience.
pub use glam::{Mat4, Quat, Vec3, Vec4};

pub use client::Client;
pub use model::Model;
pub use transform::{HasPosition, HasRotation, HasScale, Position, Rotation, Scale, Transform};
pub use velocity::Velocity;
