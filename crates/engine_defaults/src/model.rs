//! Renderable model reference.

use std::cell::{Cell, RefCell};

use engine_component::Component;
use glam::Vec4;
use serde::{Deserialize, Serialize};

/// The model an entity is drawn with, plus a tint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    path: RefCell<String>,
    color: Cell<Vec4>,
}

impl Model {
    /// Create a model component with a white tint.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: RefCell::new(path.into()),
            color: Cell::new(Vec4::ONE),
        }
    }

    /// Set the render colour.
    #[must_use]
    pub fn with_color(self, color: Vec4) -> Self {
        self.color.set(color);
        self
    }

    /// Asset path of the model.
    #[must_use]
    pub fn path(&self) -> String {
        self.path.borrow().clone()
    }

    /// Swap the model for another asset.
    pub fn set_path(&self, path: impl Into<String>) {
        *self.path.borrow_mut() = path.into();
    }

    /// Render colour as linear RGBA.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color.get()
    }

    pub fn set_color(&self, color: Vec4) {
        self.color.set(color);
    }
}

impl Component for Model {
    fn type_name() -> &'static str {
        "Model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_properties() {
        let model = Model::new("models/crate.vmdl").with_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(model.path(), "models/crate.vmdl");
        assert_eq!(model.color().x, 1.0);

        model.set_path("models/barrel.vmdl");
        model.set_color(Vec4::ONE);
        assert_eq!(model.path(), "models/barrel.vmdl");
        assert_eq!(model.color(), Vec4::ONE);
    }
}
