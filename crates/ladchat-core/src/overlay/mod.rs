//! Overlay element store: captions and drawing paths of one edit session.

mod caption;
mod drawing;

pub use caption::{CAPTION_PADDING_X, CAPTION_PADDING_Y, Caption, CaptionId};
pub use drawing::{DrawingId, DrawingPath, polyline};

use crate::config::EditorConfig;
use crate::palette::PaletteColor;
use kurbo::{Point, Rect};

/// Hit tolerance for long-press on captions, in screen pixels.
const CAPTION_HIT_TOLERANCE: f64 = 4.0;

/// Ordered captions and drawings for one session.
#[derive(Debug, Clone)]
pub struct OverlayStore {
    /// Captions in creation order (back to front).
    captions: Vec<Caption>,
    /// Drawings in creation order; the last one is undone first.
    drawings: Vec<DrawingPath>,
    /// Caption centers are clamped into this rect.
    caption_bounds: Rect,
    /// Where new captions appear.
    caption_origin: Point,
    caption_font_size: f64,
    max_caption_chars: usize,
}

impl OverlayStore {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            captions: Vec::new(),
            drawings: Vec::new(),
            caption_bounds: config.caption_bounds(),
            caption_origin: Point::new(
                config.frame_width / 2.0,
                config.frame_height * config.caption_start_ratio,
            ),
            caption_font_size: config.caption_font_size,
            max_caption_chars: config.max_caption_chars,
        }
    }

    /// Add a caption at the default position.
    /// Returns None (store unchanged) if the text is blank.
    pub fn add_caption(
        &mut self,
        text: &str,
        color: PaletteColor,
        has_background: bool,
    ) -> Option<&Caption> {
        let text = caption::normalize_caption_text(text, self.max_caption_chars)?;
        let caption = Caption::new(
            text,
            self.caption_origin,
            self.caption_font_size,
            color,
            has_background,
        );
        log::debug!("Added caption {}", caption.id);
        self.captions.push(caption);
        self.captions.last()
    }

    /// Remove a caption. Returns true if it existed.
    pub fn remove_caption(&mut self, id: CaptionId) -> bool {
        let before = self.captions.len();
        self.captions.retain(|c| c.id != id);
        before != self.captions.len()
    }

    /// Move a caption, clamping its center into the visible preview.
    /// Returns the committed position, or None if the caption is unknown.
    pub fn update_caption_position(&mut self, id: CaptionId, x: f64, y: f64) -> Option<Point> {
        let clamped = self.clamp_caption_position(Point::new(x, y));
        let caption = self.captions.iter_mut().find(|c| c.id == id)?;
        caption.position = clamped;
        Some(clamped)
    }

    /// Clamp a point into the caption bounds. An inverted range resolves to
    /// its lower bound.
    pub fn clamp_caption_position(&self, point: Point) -> Point {
        let b = self.caption_bounds;
        Point::new(
            point.x.min(b.x1).max(b.x0),
            point.y.min(b.y1).max(b.y0),
        )
    }

    /// Append a finished drawing. Returns None for an empty point list.
    pub fn add_drawing(
        &mut self,
        points: Vec<Point>,
        color: PaletteColor,
        stroke_width: f64,
    ) -> Option<&DrawingPath> {
        if points.is_empty() {
            return None;
        }
        self.drawings.push(DrawingPath::new(points, color, stroke_width));
        self.drawings.last()
    }

    /// Remove the most recently added drawing.
    pub fn undo_last_drawing(&mut self) -> Option<DrawingPath> {
        self.drawings.pop()
    }

    /// Remove every caption and drawing.
    pub fn clear_all(&mut self) {
        self.captions.clear();
        self.drawings.clear();
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn drawings(&self) -> &[DrawingPath] {
        &self.drawings
    }

    pub fn caption(&self, id: CaptionId) -> Option<&Caption> {
        self.captions.iter().find(|c| c.id == id)
    }

    /// Front-most caption under a point.
    pub fn caption_at(&self, point: Point) -> Option<CaptionId> {
        self.captions
            .iter()
            .rev()
            .find(|c| c.hit_test(point, CAPTION_HIT_TOLERANCE))
            .map(|c| c.id)
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty() && self.drawings.is_empty()
    }

    pub fn caption_bounds(&self) -> Rect {
        self.caption_bounds
    }
}
