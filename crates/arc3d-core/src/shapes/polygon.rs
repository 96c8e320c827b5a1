//! Polygon shape.

use super::{ElementId, SerializableColor, ShapeKind, ShapeTrait, generate_id, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Pentagon outline inside a 100x100 box, clockwise from the top vertex.
const PENTAGON: [(f64, f64); 5] = [
    (50.0, 0.0),
    (100.0, 38.0),
    (82.0, 100.0),
    (18.0, 100.0),
    (0.0, 38.0),
];

/// A closed polygon. Points are relative to `x`/`y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub points: Vec<Point>,
    #[serde(default)]
    pub fill: SerializableColor,
}

impl Polygon {
    /// Create the default pentagon at the given origin.
    pub fn pentagon(origin: Point) -> Self {
        Self::with_points(origin, PENTAGON.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn with_points(origin: Point, points: Vec<Point>) -> Self {
        Self {
            id: generate_id(ShapeKind::Polygon.as_str()),
            x: origin.x,
            y: origin.y,
            points,
            fill: SerializableColor::default(),
        }
    }

    /// Points in world coordinates.
    pub fn world_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points
            .iter()
            .map(move |p| Point::new(p.x + self.x, p.y + self.y))
    }
}

impl ShapeTrait for Polygon {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::from_origin_size(self.position(), (0.0, 0.0));
        }
        self.to_path().bounding_box()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        if self.to_path().contains(point) {
            return true;
        }
        let pts: Vec<Point> = self.world_points().collect();
        let n = pts.len();
        (0..n).any(|i| point_to_segment_dist(point, pts[i], pts[(i + 1) % n]) <= tolerance)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut pts = self.world_points();
        if let Some(first) = pts.next() {
            path.move_to(first);
            for p in pts {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }

    fn fill(&self) -> SerializableColor {
        self.fill
    }

    fn set_fill(&mut self, fill: SerializableColor) {
        self.fill = fill;
    }
}
