//! Text shape.

use super::{ElementId, SerializableColor, ShapeKind, ShapeTrait, generate_id};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

fn default_font_size() -> f64 {
    Text::DEFAULT_FONT_SIZE
}

/// A text box anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub fill: SerializableColor,
}

impl Text {
    pub const DEFAULT_CONTENT: &'static str = "Your Text";
    pub const DEFAULT_WIDTH: f64 = 200.0;
    pub const DEFAULT_HEIGHT: f64 = 40.0;
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;

    pub fn new(origin: Point) -> Self {
        Self::with_id(generate_id(ShapeKind::Text.as_str()), origin)
    }

    pub fn with_id(id: impl Into<ElementId>, origin: Point) -> Self {
        Self {
            id: id.into(),
            x: origin.x,
            y: origin.y,
            text: Self::DEFAULT_CONTENT.to_string(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            font_size: Self::DEFAULT_FONT_SIZE,
            fill: SerializableColor::default(),
        }
    }

    fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
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
