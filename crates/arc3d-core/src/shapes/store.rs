//! Flat, identifier-addressed collection of shapes.

use super::{Shape, ShapePatch, ShapeTrait};
use serde::{Deserialize, Serialize};

/// The shape store. Order is insertion order and carries no z meaning;
/// the layer tree owns draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Add a shape. A shape with the same id is replaced.
    pub fn add_shape(&mut self, shape: Shape) {
        if let Some(existing) = self.get_shape_mut(shape.id()) {
            log::warn!("Replacing existing shape {}", shape.id());
            *existing = shape;
        } else {
            self.shapes.push(shape);
        }
    }

    /// Apply a partial update. No-op (returns false) if the id is absent.
    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> bool {
        match self.get_shape_mut(id) {
            Some(shape) => shape.apply(patch),
            None => false,
        }
    }

    pub fn remove_shape(&mut self, id: &str) -> Option<Shape> {
        let pos = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(pos))
    }

    pub fn get_shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_shape(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rectangle};
    use kurbo::Point;

    #[test]
    fn test_add_get_remove() {
        let mut store = ShapeStore::new();
        let rect = Rectangle::with_id("r1", Point::ZERO);
        store.add_shape(rect.into());

        assert_eq!(store.len(), 1);
        assert!(store.get_shape("r1").is_some());
        assert!(store.remove_shape("r1").is_some());
        assert!(store.is_empty());
        assert!(store.remove_shape("r1").is_none());
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = ShapeStore::new();
        store.add_shape(Circle::with_id("c1", Point::ZERO).into());
        assert!(!store.update_shape("nope", &ShapePatch::position(1.0, 1.0)));
        assert_eq!(store.get_shape("c1").unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_disjoint_updates_both_land() {
        let mut store = ShapeStore::new();
        store.add_shape(Rectangle::with_id("r1", Point::ZERO).into());
        store.update_shape("r1", &ShapePatch::position(10.0, 10.0));
        store.update_shape("r1", &ShapePatch::size(20.0, 30.0));

        let Some(Shape::Rectangle(r)) = store.get_shape("r1") else {
            panic!("expected rectangle")
        };
        assert_eq!((r.x, r.y, r.width, r.height), (10.0, 10.0, 20.0, 30.0));
    }

    #[test]
    fn test_add_same_id_replaces() {
        let mut store = ShapeStore::new();
        store.add_shape(Rectangle::with_id("r1", Point::ZERO).into());
        store.add_shape(Rectangle::with_id("r1", Point::new(5.0, 5.0)).into());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_shape("r1").unwrap().position(), Point::new(5.0, 5.0));
    }
}
