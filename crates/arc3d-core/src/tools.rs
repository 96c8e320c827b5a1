//! Placement tools.

use crate::shapes::{Circle, Diamond, Polygon, Rectangle, SerializableColor, Shape, ShapeTrait, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Diamond,
    Polygon,
    Circle,
    Text,
}

impl ToolKind {
    /// Tools that drop a new shape on pointer down.
    pub fn is_placement(self) -> bool {
        !matches!(self, ToolKind::Select)
    }

    /// Build the default shape this tool places at `point`.
    pub fn create_shape(self, point: Point, fill: SerializableColor) -> Option<Shape> {
        let mut shape: Shape = match self {
            ToolKind::Select => return None,
            ToolKind::Rectangle => Rectangle::new(point).into(),
            ToolKind::Diamond => Diamond::new(point).into(),
            ToolKind::Polygon => Polygon::pentagon(point).into(),
            ToolKind::Circle => Circle::new(point).into(),
            ToolKind::Text => Text::new(point).into(),
        };
        shape.set_fill(fill);
        Some(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    #[test]
    fn test_select_places_nothing() {
        assert!(ToolKind::Select.create_shape(Point::ZERO, SerializableColor::ACCENT).is_none());
        assert!(!ToolKind::Select.is_placement());
    }

    #[test]
    fn test_tool_defaults() {
        let fill = SerializableColor::ACCENT;
        let rect = ToolKind::Rectangle.create_shape(Point::new(100.0, 100.0), fill).unwrap();
        assert_eq!(rect.kind(), ShapeKind::Rectangle);
        assert_eq!(rect.bounds().size(), kurbo::Size::new(150.0, 100.0));

        let circle = ToolKind::Circle.create_shape(Point::new(100.0, 100.0), fill).unwrap();
        assert_eq!(circle.bounds().size(), kurbo::Size::new(100.0, 100.0));

        let Some(Shape::Text(text)) = ToolKind::Text.create_shape(Point::ZERO, fill) else {
            panic!("expected text")
        };
        assert_eq!(text.text, "Your Text");
        assert_eq!(text.width, 200.0);
    }
}
