//! Filter selection and the overlay recipes filters are rendered with.

use crate::media::MediaType;
use crate::palette::Rgba8;
use peniko::Mix;
use serde::{Deserialize, Serialize};

/// Available filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Monochrome,
    Sepia,
    Brighten,
    Vintage,
    Invert,
    Saturate,
    CoolTone,
    WarmTone,
}

/// How a filter is drawn: a flat color composited over the media.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRecipe {
    pub overlay: Rgba8,
    /// Strength of the overlay (0.0 - 1.0).
    pub opacity: f64,
    pub blend: Mix,
}

impl FilterKind {
    /// Get all filters in picker order.
    pub fn all() -> &'static [FilterKind] {
        &[
            FilterKind::Monochrome,
            FilterKind::Sepia,
            FilterKind::Brighten,
            FilterKind::Vintage,
            FilterKind::Invert,
            FilterKind::Saturate,
            FilterKind::CoolTone,
            FilterKind::WarmTone,
        ]
    }

    pub fn recipe(self) -> FilterRecipe {
        let (overlay, opacity, blend) = match self {
            FilterKind::Monochrome => (Rgba8::opaque(0x80, 0x80, 0x80), 1.0, Mix::Saturation),
            FilterKind::Sepia => (Rgba8::opaque(0x70, 0x42, 0x14), 0.55, Mix::Color),
            FilterKind::Brighten => (Rgba8::opaque(0xFF, 0xFF, 0xFF), 0.25, Mix::SoftLight),
            FilterKind::Vintage => (Rgba8::opaque(0xD2, 0xA5, 0x6D), 0.35, Mix::Multiply),
            FilterKind::Invert => (Rgba8::opaque(0xFF, 0xFF, 0xFF), 1.0, Mix::Difference),
            FilterKind::Saturate => (Rgba8::opaque(0xFF, 0x00, 0x00), 0.35, Mix::Saturation),
            FilterKind::CoolTone => (Rgba8::opaque(0x3A, 0x7B, 0xD5), 0.25, Mix::Overlay),
            FilterKind::WarmTone => (Rgba8::opaque(0xFF, 0x8C, 0x42), 0.25, Mix::Overlay),
        };
        FilterRecipe {
            overlay,
            opacity,
            blend,
        }
    }

    /// Get display name for UI.
    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Monochrome => "Mono",
            FilterKind::Sepia => "Sepia",
            FilterKind::Brighten => "Bright",
            FilterKind::Vintage => "Vintage",
            FilterKind::Invert => "Invert",
            FilterKind::Saturate => "Vivid",
            FilterKind::CoolTone => "Cool",
            FilterKind::WarmTone => "Warm",
        }
    }

    /// Parse a filter name. `Ok(None)` means "none"/"original".
    pub fn parse(name: &str) -> Result<Option<FilterKind>, String> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let kind = match key.as_str() {
            "none" | "original" => return Ok(None),
            "monochrome" | "mono" | "grayscale" => FilterKind::Monochrome,
            "sepia" => FilterKind::Sepia,
            "brighten" | "bright" => FilterKind::Brighten,
            "vintage" => FilterKind::Vintage,
            "invert" => FilterKind::Invert,
            "saturate" | "vivid" => FilterKind::Saturate,
            "cooltone" | "cool" => FilterKind::CoolTone,
            "warmtone" | "warm" => FilterKind::WarmTone,
            _ => return Err(format!("Unknown filter: {}", name)),
        };
        Ok(Some(kind))
    }
}

/// Result of a filter selection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSelection {
    Applied(FilterKind),
    Cleared,
    /// Filters cannot be baked into video.
    RejectedForVideo,
}

/// Holds at most one active filter.
#[derive(Debug, Clone, Default)]
pub struct FilterSelector {
    active: Option<FilterKind>,
}

impl FilterSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a filter (None = original). Rejected for video media.
    pub fn select(&mut self, filter: Option<FilterKind>, media_type: MediaType) -> FilterSelection {
        match filter {
            None => self.select_original(),
            Some(_) if media_type == MediaType::Video => {
                log::warn!("Filter rejected: filters are only available for photos");
                FilterSelection::RejectedForVideo
            }
            Some(kind) => {
                log::debug!("Filter selected: {:?}", kind);
                self.active = Some(kind);
                FilterSelection::Applied(kind)
            }
        }
    }

    /// Back to the unfiltered original.
    pub fn select_original(&mut self) -> FilterSelection {
        self.clear();
        FilterSelection::Cleared
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<FilterKind> {
        self.active
    }

    pub fn recipe(&self) -> Option<FilterRecipe> {
        self.active.map(FilterKind::recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replaces() {
        let mut selector = FilterSelector::new();
        selector.select(Some(FilterKind::Sepia), MediaType::Photo);
        let result = selector.select(Some(FilterKind::Invert), MediaType::Photo);
        assert_eq!(result, FilterSelection::Applied(FilterKind::Invert));
        assert_eq!(selector.active(), Some(FilterKind::Invert));
    }

    #[test]
    fn test_select_none_clears() {
        let mut selector = FilterSelector::new();
        selector.select(Some(FilterKind::Vintage), MediaType::Photo);
        assert_eq!(selector.select(None, MediaType::Photo), FilterSelection::Cleared);
        assert_eq!(selector.active(), None);
        assert!(selector.recipe().is_none());
    }

    #[test]
    fn test_video_rejected() {
        let mut selector = FilterSelector::new();
        let result = selector.select(Some(FilterKind::Sepia), MediaType::Video);
        assert_eq!(result, FilterSelection::RejectedForVideo);
        assert_eq!(selector.active(), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(FilterKind::parse("Sepia"), Ok(Some(FilterKind::Sepia)));
        assert_eq!(FilterKind::parse("cool-tone"), Ok(Some(FilterKind::CoolTone)));
        assert_eq!(FilterKind::parse("warm_tone"), Ok(Some(FilterKind::WarmTone)));
        assert_eq!(FilterKind::parse("original"), Ok(None));
        assert_eq!(FilterKind::parse("none"), Ok(None));
        assert!(FilterKind::parse("glitter").is_err());
    }

    #[test]
    fn test_every_filter_has_visible_recipe() {
        for kind in FilterKind::all() {
            let recipe = kind.recipe();
            assert!(recipe.opacity > 0.0 && recipe.opacity <= 1.0, "{:?}", kind);
        }
    }
}
