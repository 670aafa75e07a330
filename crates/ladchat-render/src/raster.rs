//! CPU renderer built on `tiny-skia` and `ab_glyph`.

use crate::blend;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::text::CaptionFont;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use ladchat_core::overlay::{CAPTION_PADDING_X, CAPTION_PADDING_Y};
use ladchat_core::{Caption, DrawingPath, EditorConfig};
use tiny_skia::{
    FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// Software renderer used for export.
#[derive(Debug)]
pub struct RasterRenderer {
    font: Option<CaptionFont>,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    /// Renderer using the bundled caption font.
    pub fn new() -> Self {
        let font = CaptionFont::embedded()
            .inspect_err(|e| log::error!("Failed to load bundled caption font: {}", e))
            .ok();
        Self { font }
    }

    pub fn with_font(font: CaptionFont) -> Self {
        Self { font: Some(font) }
    }

    /// Renderer using the configured caption font.
    ///
    /// A configured font that fails to load is logged and the bundled font
    /// is used instead.
    pub fn from_config(config: &EditorConfig) -> Self {
        let Some(path) = &config.caption_font else {
            return Self::new();
        };
        match CaptionFont::load(path) {
            Ok(font) => Self::with_font(font),
            Err(e) => {
                log::warn!("{}; using bundled caption font", e);
                Self::new()
            }
        }
    }

    fn draw_drawings(pixmap: &mut Pixmap, drawings: &[DrawingPath], transform: Transform) {
        let mut paint = Paint::default();
        paint.anti_alias = true;

        for drawing in drawings {
            let color = drawing.color.rgba();
            paint.set_color_rgba8(color.r, color.g, color.b, color.a);

            let points = drawing.points();
            if let [only] = points {
                // A single tap is a dot the size of the stroke.
                let Some(dot) = PathBuilder::from_circle(
                    only.x as f32,
                    only.y as f32,
                    (drawing.stroke_width / 2.0) as f32,
                ) else {
                    continue;
                };
                pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
                continue;
            }

            let mut builder = PathBuilder::new();
            for (i, p) in points.iter().enumerate() {
                if i == 0 {
                    builder.move_to(p.x as f32, p.y as f32);
                } else {
                    builder.line_to(p.x as f32, p.y as f32);
                }
            }
            let Some(path) = builder.finish() else {
                continue;
            };
            let stroke = Stroke {
                width: drawing.stroke_width as f32,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn draw_caption_boxes(
        pixmap: &mut Pixmap,
        captions: &[Caption],
        font: &CaptionFont,
        ctx: &RenderContext,
    ) {
        let scale = ctx.scale_factor as f32;
        let background = ctx.caption_background;
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color_rgba8(background.r, background.g, background.b, background.a);

        for caption in captions.iter().filter(|c| c.has_background) {
            let metrics = font.measure(&caption.text, caption.font_size as f32);
            let half_w = metrics.width / 2.0 + CAPTION_PADDING_X as f32;
            let half_h = metrics.height() / 2.0 + CAPTION_PADDING_Y as f32;
            let (cx, cy) = (caption.position.x as f32, caption.position.y as f32);
            let Some(rect) = Rect::from_ltrb(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
            else {
                continue;
            };
            pixmap.fill_rect(rect, &paint, Transform::from_scale(scale, scale), None);
        }
    }
}

impl Renderer for RasterRenderer {
    fn flatten(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage> {
        let (width, height) = ctx.output_size();
        let font = match (&self.font, ctx.captions.is_empty()) {
            (Some(font), _) => Some(font),
            (None, true) => None,
            (None, false) => {
                return Err(RendererError::RenderFailed(
                    "No caption font available".to_string(),
                ));
            }
        };

        let mut image = cover(ctx.base, width, height)?;
        if let Some(recipe) = &ctx.filter {
            blend::apply_recipe(&mut image, recipe);
        }

        let mut pixmap = to_pixmap(image)?;
        let transform = Transform::from_scale(ctx.scale_factor as f32, ctx.scale_factor as f32);
        Self::draw_drawings(&mut pixmap, ctx.drawings, transform);
        if let Some(font) = font {
            Self::draw_caption_boxes(&mut pixmap, ctx.captions, font, ctx);
        }
        let mut image = from_pixmap(&pixmap)?;

        if let Some(font) = font {
            let scale = ctx.scale_factor as f32;
            for caption in ctx.captions {
                font.draw_centered(
                    &mut image,
                    &caption.text,
                    caption.font_size as f32 * scale,
                    caption.position.x as f32 * scale,
                    caption.position.y as f32 * scale,
                    caption.color.rgba(),
                );
            }
        }

        Ok(image)
    }
}

/// Scale `base` to cover `width` x `height` and crop the center.
fn cover(base: &RgbaImage, width: u32, height: u32) -> RenderResult<RgbaImage> {
    let (bw, bh) = base.dimensions();
    if bw == 0 || bh == 0 {
        return Err(RendererError::RenderFailed("Base image is empty".to_string()));
    }
    let scale = (width as f64 / bw as f64).max(height as f64 / bh as f64);
    let sw = ((bw as f64 * scale).ceil() as u32).max(width);
    let sh = ((bh as f64 * scale).ceil() as u32).max(height);
    let resized = if (sw, sh) == (bw, bh) {
        base.clone()
    } else {
        imageops::resize(base, sw, sh, FilterType::Triangle)
    };
    let x = (sw - width) / 2;
    let y = (sh - height) / 2;
    Ok(imageops::crop_imm(&resized, x, y, width, height).to_image())
}

fn to_pixmap(image: RgbaImage) -> RenderResult<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| RendererError::Surface(format!("Invalid size {}x{}", width, height)))?;
    let mut data = image.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }
    Pixmap::from_vec(data, size)
        .ok_or_else(|| RendererError::Surface("Failed to create pixmap".to_string()))
}

fn from_pixmap(pixmap: &Pixmap) -> RenderResult<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| RendererError::Surface("Pixel buffer size mismatch".to_string()))
}
