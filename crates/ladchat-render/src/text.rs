//! Caption text rasterization with `ab_glyph`.

use crate::renderer::{RenderResult, RendererError};
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::RgbaImage;
use ladchat_core::Rgba8;
use std::path::Path;

/// Embedded DejaVu Sans Bold, the caption font unless one is configured.
static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

/// Measured single-line text extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// Font used to draw captions.
#[derive(Clone)]
pub struct CaptionFont {
    font: FontArc,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont").finish_non_exhaustive()
    }
}

impl CaptionFont {
    /// Load a TrueType/OpenType font file.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            RendererError::InitFailed(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| RendererError::InitFailed(format!("Invalid font data: {}", e)))?;
        Ok(Self { font })
    }

    /// The bundled caption font.
    pub fn embedded() -> RenderResult<Self> {
        let font = FontArc::try_from_slice(DEJAVU_SANS_BOLD)
            .map_err(|e| RendererError::InitFailed(format!("Invalid embedded font: {}", e)))?;
        Ok(Self { font })
    }

    pub fn measure(&self, text: &str, size: f32) -> TextMetrics {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        TextMetrics {
            width,
            ascent: scaled.ascent(),
            descent: scaled.descent(),
        }
    }

    /// Draw one line of text centered on `(cx, cy)`, alpha-blended over
    /// the image.
    pub fn draw_centered(
        &self,
        image: &mut RgbaImage,
        text: &str,
        size: f32,
        cx: f32,
        cy: f32,
        color: Rgba8,
    ) {
        let metrics = self.measure(text, size);
        let scaled = self.font.as_scaled(PxScale::from(size));
        let baseline = cy - metrics.height() / 2.0 + metrics.ascent;
        let (width, height) = image.dimensions();

        let mut x = cx - metrics.width / 2.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(size, point(x, baseline));
            x += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                let alpha = coverage.clamp(0.0, 1.0) * color.a as f32 / 255.0;
                if alpha <= 0.0 {
                    return;
                }
                let dst = image.get_pixel_mut(px as u32, py as u32);
                blend_over(&mut dst.0, color, alpha);
            });
        }
    }
}

/// Straight-alpha source-over of a solid color onto a pixel.
pub(crate) fn blend_over(dst: &mut [u8; 4], color: Rgba8, alpha: f32) {
    let src = [color.r, color.g, color.b];
    for i in 0..3 {
        let value = src[i] as f32 * alpha + dst[i] as f32 * (1.0 - alpha);
        dst[i] = value.round().clamp(0.0, 255.0) as u8;
    }
    let out_alpha = alpha * 255.0 + dst[3] as f32 * (1.0 - alpha);
    dst[3] = out_alpha.round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_blend_over() {
        let mut px = [0, 0, 0, 255];
        blend_over(&mut px, Rgba8::opaque(255, 255, 255), 0.5);
        assert_eq!(px, [128, 128, 128, 255]);

        let mut px = [10, 20, 30, 255];
        blend_over(&mut px, Rgba8::opaque(255, 0, 0), 1.0);
        assert_eq!(px, [255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_font_file() {
        let result = CaptionFont::load(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(RendererError::InitFailed(_))));
    }

    #[test]
    fn test_invalid_font_data() {
        let result = CaptionFont::from_bytes(b"not a font".to_vec());
        assert!(matches!(result, Err(RendererError::InitFailed(_))));
    }

    #[test]
    fn test_measure_with_embedded_font() {
        let font = CaptionFont::embedded().unwrap();
        let short = font.measure("Hi", 24.0);
        let long = font.measure("Hi there", 24.0);
        assert!(long.width > short.width);
        assert!(short.height() > 0.0);
    }

    #[test]
    fn test_draw_centered_covers_center() {
        let font = CaptionFont::embedded().unwrap();
        let mut canvas = RgbaImage::from_pixel(80, 40, Rgba([0, 0, 0, 255]));
        font.draw_centered(&mut canvas, "HH", 24.0, 40.0, 20.0, Rgba8::opaque(255, 255, 255));

        let lit: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, px)| px[0] > 128)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        // Glyphs stay near the requested center.
        assert!(lit.iter().all(|&(x, y)| (15..65).contains(&x) && (2..38).contains(&y)));
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
    }
}
