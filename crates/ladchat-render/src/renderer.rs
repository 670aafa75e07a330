//! Renderer trait abstraction.

use image::RgbaImage;
use kurbo::Size;
use ladchat_core::palette::CAPTION_BACKGROUND;
use ladchat_core::{Caption, DrawingPath, FilterRecipe, Rgba8};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything needed to flatten one edit into an image.
pub struct RenderContext<'a> {
    /// Decoded base media.
    pub base: &'a RgbaImage,
    /// Visible preview region in screen pixels; overlays use these coordinates.
    pub frame_size: Size,
    /// Output pixels per screen pixel.
    pub scale_factor: f64,
    /// Filter tint, if one is active.
    pub filter: Option<FilterRecipe>,
    /// Drawings, back to front.
    pub drawings: &'a [DrawingPath],
    /// Captions, back to front.
    pub captions: &'a [Caption],
    /// Fill of caption background boxes.
    pub caption_background: Rgba8,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(base: &'a RgbaImage, frame_size: Size) -> Self {
        Self {
            base,
            frame_size,
            scale_factor: 1.0,
            filter: None,
            drawings: &[],
            captions: &[],
            caption_background: CAPTION_BACKGROUND,
        }
    }

    /// Set the export scale.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_filter(mut self, filter: Option<FilterRecipe>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_drawings(mut self, drawings: &'a [DrawingPath]) -> Self {
        self.drawings = drawings;
        self
    }

    pub fn with_captions(mut self, captions: &'a [Caption]) -> Self {
        self.captions = captions;
        self
    }

    /// Output image size in pixels (at least 1x1).
    pub fn output_size(&self) -> (u32, u32) {
        let width = (self.frame_size.width * self.scale_factor).round().max(1.0);
        let height = (self.frame_size.height * self.scale_factor).round().max(1.0);
        (width as u32, height as u32)
    }

    /// Check if anything is drawn over the base.
    pub fn has_overlays(&self) -> bool {
        self.filter.is_some() || !self.drawings.is_empty() || !self.captions.is_empty()
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Flatten the base and all overlays into one image.
    fn flatten(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage>;
}
