//! Circle shape.

use super::{ElementId, SerializableColor, ShapeKind, ShapeTrait, generate_id};
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ElementId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub radius: f64,
    #[serde(default)]
    pub fill: SerializableColor,
}

impl Circle {
    pub const DEFAULT_RADIUS: f64 = 50.0;

    pub fn new(center: Point) -> Self {
        Self::with_id(generate_id(ShapeKind::Circle.as_str()), center)
    }

    pub fn with_id(id: impl Into<ElementId>, center: Point) -> Self {
        Self {
            id: id.into(),
            x: center.x,
            y: center.y,
            radius: Self::DEFAULT_RADIUS,
            fill: SerializableColor::default(),
        }
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(Point::new(self.x, self.y), self.radius.abs())
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    fn bounds(&self) -> Rect {
        self.as_kurbo().bounding_box()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.distance(Point::new(self.x, self.y)) <= self.radius.abs() + tolerance
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn fill(&self) -> SerializableColor {
        self.fill
    }

    fn set_fill(&mut self, fill: SerializableColor) {
        self.fill = fill;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_center() {
        let c = Circle::new(Point::new(100.0, 100.0));
        assert_eq!(c.bounds(), Rect::new(50.0, 50.0, 150.0, 150.0));
        assert!(c.hit_test(Point::new(140.0, 100.0), 0.0));
        assert!(!c.hit_test(Point::new(145.0, 145.0), 0.0));
    }
}
