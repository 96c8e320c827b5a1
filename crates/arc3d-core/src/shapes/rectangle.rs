//! Rectangle shape.

use super::{ElementId, SerializableColor, ShapeKind, ShapeTrait, generate_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub fill: SerializableColor,
}

impl Rectangle {
    pub const DEFAULT_WIDTH: f64 = 150.0;
    pub const DEFAULT_HEIGHT: f64 = 100.0;

    /// Create a rectangle with the default placement size.
    pub fn new(origin: Point) -> Self {
        Self::with_id(generate_id(ShapeKind::Rectangle.as_str()), origin)
    }

    /// Create a default-sized rectangle with a specific ID.
    pub fn with_id(id: impl Into<ElementId>, origin: Point) -> Self {
        Self {
            id: id.into(),
            x: origin.x,
            y: origin.y,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            fill: SerializableColor::default(),
        }
    }

    /// Builder-style size override.
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Get as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn fill(&self) -> SerializableColor {
        self.fill
    }

    fn set_fill(&mut self, fill: SerializableColor) {
        self.fill = fill;
    }
}
