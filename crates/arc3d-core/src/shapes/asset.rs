//! Asset shape: a placed reference to a 3D model (uploaded or generated).

use super::{ElementId, SerializableColor, ShapeKind, ShapeTrait, generate_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A model placeholder. The canvas only knows its frame and source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub url: String,
    #[serde(default)]
    pub fill: SerializableColor,
}

impl Asset {
    pub const DEFAULT_SIZE: f64 = 200.0;

    pub fn new(url: impl Into<String>, origin: Point) -> Self {
        Self {
            id: generate_id(ShapeKind::Asset.as_str()),
            x: origin.x,
            y: origin.y,
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            url: url.into(),
            fill: SerializableColor::default(),
        }
    }

    fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

impl ShapeTrait for Asset {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Asset
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    fn bounds(&self) -> Rect {
        self.frame()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.frame().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.frame().to_path(0.1)
    }

    fn fill(&self) -> SerializableColor {
        self.fill
    }

    fn set_fill(&mut self, fill: SerializableColor) {
        self.fill = fill;
    }
}
