//! Diamond shape: a square rotated 45 degrees about its own center.

use super::{ElementId, SerializableColor, ShapeKind, ShapeTrait, generate_id};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// A diamond. `x`/`y`/`width`/`height` describe the unrotated box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diamond {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub fill: SerializableColor,
}

impl Diamond {
    pub const DEFAULT_SIZE: f64 = 100.0;

    pub fn new(origin: Point) -> Self {
        Self::with_id(generate_id(ShapeKind::Diamond.as_str()), origin)
    }

    pub fn with_id(id: impl Into<ElementId>, origin: Point) -> Self {
        Self {
            id: id.into(),
            x: origin.x,
            y: origin.y,
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            fill: SerializableColor::default(),
        }
    }

    /// The unrotated box.
    pub fn base_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Rotation pivoting on the box center (not the top-left corner).
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(FRAC_PI_4, self.base_rect().center())
    }
}

impl ShapeTrait for Diamond {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Diamond
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    fn bounds(&self) -> Rect {
        self.transform().transform_rect_bbox(self.base_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.transform().inverse() * point;
        self.base_rect().inflate(tolerance, tolerance).contains(local)
    }

    fn to_path(&self) -> BezPath {
        self.transform() * self.base_rect().to_path(0.1)
    }

    fn fill(&self) -> SerializableColor {
        self.fill
    }

    fn set_fill(&mut self, fill: SerializableColor) {
        self.fill = fill;
    }
}
