//! Freehand drawing overlay.

use crate::palette::PaletteColor;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for drawing paths.
pub type DrawingId = Uuid;

/// A finished freehand stroke. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPath {
    pub(crate) id: DrawingId,
    /// Polyline points in screen-space pixels.
    points: Vec<Point>,
    pub color: PaletteColor,
    pub stroke_width: f64,
}

impl DrawingPath {
    pub(crate) fn new(points: Vec<Point>, color: PaletteColor, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            stroke_width,
        }
    }

    pub fn id(&self) -> DrawingId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Polyline through all points.
    pub fn to_path(&self) -> BezPath {
        polyline(&self.points)
    }

    /// SVG path command string (`M x y L x y ...`).
    pub fn path_data(&self) -> String {
        self.to_path().to_svg()
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let rect = self
            .points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        let half = self.stroke_width / 2.0;
        rect.inflate(half, half)
    }
}

/// Build a polyline path from points.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for point in rest {
        path.line_to(*point);
    }
    path
}
