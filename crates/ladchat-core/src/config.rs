//! Editor configuration: frame geometry, tool defaults and export settings.
//!
//! Loaded once at startup and shared read-only between the session and the
//! exporter.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Image format written by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Editor configuration persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Screen size the editing overlay is laid out in.
    pub frame_width: f64,
    pub frame_height: f64,
    /// Share of the frame height showing the media preview.
    pub preview_height_ratio: f64,
    /// Distance caption centers keep from the preview edges.
    pub clamp_margin: f64,
    /// Vertical position of new captions as a share of the frame height.
    pub caption_start_ratio: f64,
    /// Pointer travel (per axis) before a press becomes a drag.
    pub drag_threshold: f64,
    pub caption_font_size: f64,
    pub max_caption_chars: usize,
    pub stroke_width: f64,
    /// Export resolution multiplier relative to the preview region.
    pub export_scale: f64,
    pub output_format: OutputFormat,
    pub jpeg_quality: u8,
    /// Directory edited images are written to (None = platform cache dir).
    pub output_dir: Option<PathBuf>,
    /// TrueType/OpenType font used to bake caption text.
    pub caption_font: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frame_width: 390.0,
            frame_height: 844.0,
            preview_height_ratio: 0.7,
            clamp_margin: 60.0,
            caption_start_ratio: 0.4,
            drag_threshold: 2.0,
            caption_font_size: 24.0,
            max_caption_chars: 100,
            stroke_width: 5.0,
            export_scale: 1.0,
            output_format: OutputFormat::Jpeg,
            jpeg_quality: 90,
            output_dir: None,
            caption_font: None,
        }
    }
}

impl EditorConfig {
    /// Config with a specific frame size and defaults otherwise.
    pub fn with_frame(width: f64, height: f64) -> Self {
        Self {
            frame_width: width,
            frame_height: height,
            ..Self::default()
        }
    }

    pub fn frame_size(&self) -> Size {
        Size::new(self.frame_width, self.frame_height)
    }

    /// The on-screen region showing the media (top of the frame).
    pub fn preview_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.frame_width,
            self.frame_height * self.preview_height_ratio,
        )
    }

    /// Bounds caption centers are clamped into.
    pub fn caption_bounds(&self) -> Rect {
        let preview = self.preview_rect();
        Rect::new(
            self.clamp_margin,
            self.clamp_margin,
            preview.x1 - self.clamp_margin,
            preview.y1 - self.clamp_margin,
        )
    }

    /// Directory for exported images.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ladchat")
                .join("edits")
        })
    }

    /// Default config file location.
    ///
    /// On Unix: `~/.config/ladchat/editor.json`
    pub fn default_path() -> ConfigResult<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("ladchat").join("editor.json"))
    }

    /// Load config from disk, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or corrupt one is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config file at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load config {:?}: {}; using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Config saved to {:?}", path);
        Ok(())
    }
}
