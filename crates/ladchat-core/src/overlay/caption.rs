//! Caption overlay.

use crate::palette::PaletteColor;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for captions.
pub type CaptionId = Uuid;

/// Horizontal/vertical padding of the caption background box.
pub const CAPTION_PADDING_X: f64 = 8.0;
pub const CAPTION_PADDING_Y: f64 = 4.0;

/// A text caption placed on the media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub(crate) id: CaptionId,
    /// Caption text (trimmed, never empty).
    pub text: String,
    /// Center of the caption in screen-space pixels.
    pub position: Point,
    /// Font size in pixels.
    pub font_size: f64,
    pub color: PaletteColor,
    /// Draw a translucent box behind the text.
    pub has_background: bool,
}

impl Caption {
    pub(crate) fn new(
        text: String,
        position: Point,
        font_size: f64,
        color: PaletteColor,
        has_background: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            position,
            font_size,
            color,
            has_background,
        }
    }

    pub fn id(&self) -> CaptionId {
        self.id
    }

    /// Approximate text width; actual width depends on the font.
    pub fn approximate_width(&self) -> f64 {
        self.text.chars().count() as f64 * self.font_size * 0.55
    }

    /// Line height is 1.2 * font size.
    pub fn approximate_height(&self) -> f64 {
        self.font_size * 1.2
    }

    /// Approximate bounds including the background padding, centered on the
    /// caption position.
    pub fn bounds(&self) -> Rect {
        let half_w = self.approximate_width() / 2.0 + CAPTION_PADDING_X;
        let half_h = self.approximate_height() / 2.0 + CAPTION_PADDING_Y;
        Rect::new(
            self.position.x - half_w,
            self.position.y - half_h,
            self.position.x + half_w,
            self.position.y + half_h,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }
}

/// Trim and cap caption input. Returns None for blank input.
pub(crate) fn normalize_caption_text(text: &str, max_chars: usize) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}
