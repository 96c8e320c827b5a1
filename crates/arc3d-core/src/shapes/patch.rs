//! Typed partial updates for shapes.

use super::{SerializableColor, Shape};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A partial shape update. Only `Some` fields are written; fields that do not
/// apply to the shape's type are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<SerializableColor>,
}

fn write<T: PartialEq + Clone>(slot: &mut T, value: &Option<T>) -> bool {
    match value {
        Some(v) if slot != v => {
            *slot = v.clone();
            true
        }
        _ => false,
    }
}

impl ShapePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn fill(color: SerializableColor) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the provided fields into `shape`. Returns true if anything changed.
    pub(crate) fn apply_to(&self, shape: &mut Shape) -> bool {
        let mut changed = false;
        let ignored = match shape {
            Shape::Rectangle(s) => {
                changed |= write(&mut s.x, &self.x) | write(&mut s.y, &self.y);
                changed |= write(&mut s.width, &self.width) | write(&mut s.height, &self.height);
                changed |= write(&mut s.fill, &self.fill);
                self.radius.is_some() || self.points.is_some() || self.text.is_some()
            }
            Shape::Diamond(s) => {
                changed |= write(&mut s.x, &self.x) | write(&mut s.y, &self.y);
                changed |= write(&mut s.width, &self.width) | write(&mut s.height, &self.height);
                changed |= write(&mut s.fill, &self.fill);
                self.radius.is_some() || self.points.is_some() || self.text.is_some()
            }
            Shape::Polygon(s) => {
                changed |= write(&mut s.x, &self.x) | write(&mut s.y, &self.y);
                changed |= write(&mut s.points, &self.points);
                changed |= write(&mut s.fill, &self.fill);
                self.width.is_some() || self.radius.is_some() || self.text.is_some()
            }
            Shape::Circle(s) => {
                changed |= write(&mut s.x, &self.x) | write(&mut s.y, &self.y);
                changed |= write(&mut s.radius, &self.radius);
                changed |= write(&mut s.fill, &self.fill);
                self.width.is_some() || self.points.is_some() || self.text.is_some()
            }
            Shape::Text(s) => {
                changed |= write(&mut s.x, &self.x) | write(&mut s.y, &self.y);
                changed |= write(&mut s.width, &self.width) | write(&mut s.height, &self.height);
                changed |= write(&mut s.text, &self.text) | write(&mut s.font_size, &self.font_size);
                changed |= write(&mut s.fill, &self.fill);
                self.radius.is_some() || self.points.is_some()
            }
            Shape::Asset(s) => {
                changed |= write(&mut s.x, &self.x) | write(&mut s.y, &self.y);
                changed |= write(&mut s.width, &self.width) | write(&mut s.height, &self.height);
                changed |= write(&mut s.fill, &self.fill);
                self.radius.is_some() || self.points.is_some() || self.text.is_some()
            }
        };
        if ignored {
            log::debug!("Ignoring patch fields that do not apply to this shape type");
        }
        changed
    }
}
