//! Gesture tracking: caption drags and freehand strokes.
//!
//! The tracker owns only transient per-gesture state. Caption positions are
//! committed to the overlay store once, when a drag ends.

use crate::overlay::CaptionId;
use kurbo::{Point, Rect, Vec2};

/// An in-progress caption drag.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionDrag {
    pub caption_id: CaptionId,
    /// Committed caption position when the gesture started.
    pub origin: Point,
    /// Where the pointer went down.
    pub press_point: Point,
    /// Live visual offset (zero until the drag is recognized).
    pub offset: Vec2,
    /// Movement has exceeded the drag threshold.
    pub recognized: bool,
}

impl CaptionDrag {
    /// Position the caption should be rendered at right now.
    pub fn live_position(&self) -> Point {
        self.origin + self.offset
    }
}

/// State of the current gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    CaptionDrag(CaptionDrag),
    /// Live preview of a freehand stroke.
    Stroke { points: Vec<Point> },
}

/// Converts raw pointer input into drag offsets or stroke points.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: GestureState,
    /// Per-axis travel before a press counts as a drag.
    drag_threshold: f64,
}

impl GestureTracker {
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            state: GestureState::Idle,
            drag_threshold,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Start dragging a caption. Nothing is written to the store yet.
    pub fn begin_caption_drag(&mut self, caption_id: CaptionId, origin: Point, press_point: Point) {
        self.state = GestureState::CaptionDrag(CaptionDrag {
            caption_id,
            origin,
            press_point,
            offset: Vec2::ZERO,
            recognized: false,
        });
    }

    /// Update the live drag offset. Returns the offset once the drag has
    /// been recognized.
    pub fn update_caption_drag(&mut self, point: Point) -> Option<Vec2> {
        let threshold = self.drag_threshold;
        let GestureState::CaptionDrag(drag) = &mut self.state else {
            return None;
        };
        let delta = point - drag.press_point;
        if !drag.recognized && (delta.x.abs() > threshold || delta.y.abs() > threshold) {
            drag.recognized = true;
        }
        if drag.recognized {
            drag.offset = delta;
            Some(delta)
        } else {
            None
        }
    }

    /// Finish a caption drag. Returns the caption and its unclamped final
    /// position if the gesture was a drag; a tap returns None.
    pub fn end_caption_drag(&mut self, point: Point) -> Option<(CaptionId, Point)> {
        self.update_caption_drag(point);
        let GestureState::CaptionDrag(drag) = std::mem::take(&mut self.state) else {
            return None;
        };
        drag.recognized
            .then(|| (drag.caption_id, drag.origin + (point - drag.press_point)))
    }

    /// Live offset for a caption (zero if it is not being dragged).
    pub fn live_offset(&self, caption_id: CaptionId) -> Vec2 {
        match &self.state {
            GestureState::CaptionDrag(drag) if drag.caption_id == caption_id => drag.offset,
            _ => Vec2::ZERO,
        }
    }

    /// Start a stroke. Presses outside the media frame are ignored.
    pub fn begin_stroke(&mut self, point: Point, frame: Rect) -> bool {
        if !frame.contains(point) {
            return false;
        }
        self.state = GestureState::Stroke {
            points: vec![point],
        };
        true
    }

    /// Append a point to the live stroke, clamped into the frame.
    pub fn extend_stroke(&mut self, point: Point, frame: Rect) {
        if let GestureState::Stroke { points } = &mut self.state {
            let point = Point::new(
                point.x.clamp(frame.x0, frame.x1),
                point.y.clamp(frame.y0, frame.y1),
            );
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
    }

    /// Finish the live stroke and hand back its points.
    pub fn end_stroke(&mut self, point: Point, frame: Rect) -> Option<Vec<Point>> {
        self.extend_stroke(point, frame);
        match std::mem::take(&mut self.state) {
            GestureState::Stroke { points } => Some(points),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Points of the live stroke preview.
    pub fn live_stroke(&self) -> Option<&[Point]> {
        match &self.state {
            GestureState::Stroke { points } => Some(points),
            _ => None,
        }
    }

    /// Drop any in-progress gesture without committing it.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}
