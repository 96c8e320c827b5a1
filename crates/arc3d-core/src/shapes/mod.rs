//! Drawable primitives for the overlay canvas.

mod asset;
mod circle;
mod diamond;
mod patch;
mod polygon;
mod rectangle;
mod store;
mod text;

pub use asset::Asset;
pub use circle::Circle;
pub use diamond::Diamond;
pub use patch::ShapePatch;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use store::ShapeStore;
pub use text::Text;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier shared by a shape and its layer.
pub type ElementId = String;

/// Generate a fresh identifier of the form `{prefix}-{uuid}`.
pub fn generate_id(prefix: &str) -> ElementId {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Serializable color representation (RGBA8), written as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    /// Brand purple used for newly placed shapes.
    pub const ACCENT: Self = Self::new(0x91, 0x46, 0xff, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = byte(&hex[0..1])? * 17;
                let g = byte(&hex[1..2])? * 17;
                let b = byte(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::ACCENT
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {}", value))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Primitive type of a shape. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Diamond,
    Polygon,
    Circle,
    Text,
    /// Reference to an uploaded or generated 3D model.
    Asset,
}

impl ShapeKind {
    /// Wire name, also used as the identifier prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Circle => "circle",
            ShapeKind::Text => "text",
            ShapeKind::Asset => "asset",
        }
    }

    /// Label shown in the layer panel.
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Circle => "Circle",
            ShapeKind::Text => "Text",
            ShapeKind::Asset => "Model",
        }
    }
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point.distance(proj)
}

/// Common behavior of every primitive.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> &str;

    /// Primitive type.
    fn kind(&self) -> ShapeKind;

    /// Anchor position (top-left, or center for circles).
    fn position(&self) -> Point;

    /// Move the anchor to a new position.
    fn set_position(&mut self, position: Point);

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Outline path for rendering and clipping.
    fn to_path(&self) -> BezPath;

    /// Fill color.
    fn fill(&self) -> SerializableColor;

    /// Replace the fill color.
    fn set_fill(&mut self, fill: SerializableColor);

    /// Translate the shape by a delta.
    fn translate(&mut self, dx: f64, dy: f64) {
        let p = self.position();
        self.set_position(Point::new(p.x + dx, p.y + dy));
    }
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Diamond(Diamond),
    Polygon(Polygon),
    Circle(Circle),
    Text(Text),
    Asset(Asset),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Rectangle($s) => $body,
            Shape::Diamond($s) => $body,
            Shape::Polygon($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Text($s) => $body,
            Shape::Asset($s) => $body,
        }
    };
}

impl Shape {
    /// Clone this shape under a freshly generated identifier.
    pub fn with_new_id(&self) -> Shape {
        let mut copy = self.clone();
        let id = generate_id(self.kind().as_str());
        dispatch!(&mut copy, s => s.id = id);
        copy
    }

    /// Apply a partial update, returning true if any field changed.
    pub fn apply(&mut self, patch: &ShapePatch) -> bool {
        patch.apply_to(self)
    }
}

impl ShapeTrait for Shape {
    fn id(&self) -> &str {
        dispatch!(self, s => s.id())
    }

    fn kind(&self) -> ShapeKind {
        dispatch!(self, s => s.kind())
    }

    fn position(&self) -> Point {
        dispatch!(self, s => s.position())
    }

    fn set_position(&mut self, position: Point) {
        dispatch!(self, s => s.set_position(position))
    }

    fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance))
    }

    fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    fn fill(&self) -> SerializableColor {
        dispatch!(self, s => s.fill())
    }

    fn set_fill(&mut self, fill: SerializableColor) {
        dispatch!(self, s => s.set_fill(fill))
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<Diamond> for Shape {
    fn from(s: Diamond) -> Self {
        Shape::Diamond(s)
    }
}

impl From<Polygon> for Shape {
    fn from(s: Polygon) -> Self {
        Shape::Polygon(s)
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Text> for Shape {
    fn from(s: Text) -> Self {
        Shape::Text(s)
    }
}

impl From<Asset> for Shape {
    fn from(s: Asset) -> Self {
        Shape::Asset(s)
    }
}
