//! Per-pixel blend modes for filter tints.
//!
//! Formulas follow the W3C Compositing and Blending Level 1 definitions.
//! The tint color is composited over an opaque backdrop:
//! `result = (1 - a) * Cb + a * B(Cb, Cs)`.

use image::RgbaImage;
use ladchat_core::FilterRecipe;
use peniko::Mix;

type Rgb = [f32; 3];

/// Apply a filter recipe to every pixel of `image` in place.
pub fn apply_recipe(image: &mut RgbaImage, recipe: &FilterRecipe) {
    let source = [
        recipe.overlay.r as f32 / 255.0,
        recipe.overlay.g as f32 / 255.0,
        recipe.overlay.b as f32 / 255.0,
    ];
    let alpha = (recipe.opacity as f32 * recipe.overlay.a as f32 / 255.0).clamp(0.0, 1.0);
    if alpha == 0.0 {
        return;
    }

    for pixel in image.pixels_mut() {
        let backdrop = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];
        let blended = blend(recipe.blend, backdrop, source);
        for i in 0..3 {
            let value = (1.0 - alpha) * backdrop[i] + alpha * blended[i];
            pixel[i] = to_u8(value);
        }
    }
}

/// Blend a source color onto a backdrop color (both straight RGB in 0..1).
pub fn blend(mode: Mix, backdrop: Rgb, source: Rgb) -> Rgb {
    match mode {
        Mix::Normal => source,
        Mix::Multiply => separable(backdrop, source, |b, s| b * s),
        Mix::Screen => separable(backdrop, source, screen),
        Mix::Overlay => separable(backdrop, source, |b, s| hard_light(s, b)),
        Mix::Darken => separable(backdrop, source, f32::min),
        Mix::Lighten => separable(backdrop, source, f32::max),
        Mix::ColorDodge => separable(backdrop, source, color_dodge),
        Mix::ColorBurn => separable(backdrop, source, color_burn),
        Mix::HardLight => separable(backdrop, source, hard_light),
        Mix::SoftLight => separable(backdrop, source, soft_light),
        Mix::Difference => separable(backdrop, source, |b, s| (b - s).abs()),
        Mix::Exclusion => separable(backdrop, source, |b, s| b + s - 2.0 * b * s),
        Mix::Hue => set_lum(set_sat(source, sat(backdrop)), lum(backdrop)),
        Mix::Saturation => set_lum(set_sat(backdrop, sat(source)), lum(backdrop)),
        Mix::Color => set_lum(source, lum(backdrop)),
        Mix::Luminosity => set_lum(backdrop, lum(source)),
        #[allow(unreachable_patterns)]
        _ => source,
    }
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn separable(backdrop: Rgb, source: Rgb, f: impl Fn(f32, f32) -> f32) -> Rgb {
    [
        f(backdrop[0], source[0]),
        f(backdrop[1], source[1]),
        f(backdrop[2], source[2]),
    ]
}

fn screen(b: f32, s: f32) -> f32 {
    b + s - b * s
}

fn hard_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b * 2.0 * s
    } else {
        screen(b, 2.0 * s - 1.0)
    }
}

fn color_dodge(b: f32, s: f32) -> f32 {
    if b == 0.0 {
        0.0
    } else if s >= 1.0 {
        1.0
    } else {
        (b / (1.0 - s)).min(1.0)
    }
}

fn color_burn(b: f32, s: f32) -> f32 {
    if b >= 1.0 {
        1.0
    } else if s <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - b) / s).min(1.0)
    }
}

fn soft_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b - (1.0 - 2.0 * s) * b * (1.0 - b)
    } else {
        let d = if b <= 0.25 {
            ((16.0 * b - 12.0) * b + 4.0) * b
        } else {
            b.sqrt()
        };
        b + (2.0 * s - 1.0) * (d - b)
    }
}

fn lum(c: Rgb) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: Rgb) -> Rgb {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        for v in &mut out {
            *v = l + (*v - l) * l / (l - n);
        }
    }
    if x > 1.0 {
        for v in &mut out {
            *v = l + (*v - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

fn set_lum(c: Rgb, l: f32) -> Rgb {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn sat(c: Rgb) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: Rgb, s: f32) -> Rgb {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    if max <= min {
        return [0.0; 3];
    }
    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = if c[i] == max {
            s
        } else if c[i] == min {
            0.0
        } else {
            (c[i] - min) * s / (max - min)
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use ladchat_core::FilterKind;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| Rgba([(x * 60) as u8, (y * 60) as u8, 180, 255]))
    }

    #[test]
    fn test_monochrome_is_gray() {
        let mut image = sample();
        apply_recipe(&mut image, &FilterKind::Monochrome.recipe());
        for p in image.pixels() {
            assert!(p[0].abs_diff(p[1]) <= 1 && p[1].abs_diff(p[2]) <= 1, "{:?}", p);
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn test_invert() {
        let mut image = sample();
        let original = image.clone();
        apply_recipe(&mut image, &FilterKind::Invert.recipe());
        for (a, b) in image.pixels().zip(original.pixels()) {
            assert_eq!(a[0], 255 - b[0]);
            assert_eq!(a[1], 255 - b[1]);
            assert_eq!(a[2], 255 - b[2]);
        }
    }

    #[test]
    fn test_every_filter_changes_pixels() {
        for kind in FilterKind::all() {
            let mut image = sample();
            apply_recipe(&mut image, &kind.recipe());
            assert_ne!(image, sample(), "{:?} left the image unchanged", kind);
        }
    }

    #[test]
    fn test_luminosity_preserved_by_color() {
        let backdrop = [0.2, 0.6, 0.4];
        let out = blend(Mix::Color, backdrop, [0.44, 0.26, 0.08]);
        assert!((lum(out) - lum(backdrop)).abs() < 1e-4);
    }

    #[test]
    fn test_separable_modes() {
        assert_eq!(blend(Mix::Multiply, [0.5, 1.0, 0.0], [0.5, 0.5, 0.5]), [0.25, 0.5, 0.0]);
        assert_eq!(blend(Mix::Screen, [0.0, 1.0, 0.5], [0.0, 0.0, 0.5]), [0.0, 1.0, 0.75]);
        assert_eq!(blend(Mix::SoftLight, [0.3, 0.3, 0.3], [0.5, 0.5, 0.5]), [0.3, 0.3, 0.3]);
    }
}
