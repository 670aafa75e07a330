//! Captured media references and the hand-off produced when an edit is saved.

use crate::filter::FilterKind;
use crate::overlay::{Caption, DrawingPath};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Photo or video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Photo,
    Video,
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photo" | "image" => Ok(MediaType::Photo),
            "video" => Ok(MediaType::Video),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}

/// Reference to a local media file (plain path or `file://` URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self(path.into().to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem path the reference points at.
    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(self.0.strip_prefix("file://").unwrap_or(&self.0))
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media handed to the editor by the capture screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedMedia {
    pub reference: MediaRef,
    pub media_type: MediaType,
}

impl CapturedMedia {
    pub fn photo(reference: MediaRef) -> Self {
        Self {
            reference,
            media_type: MediaType::Photo,
        }
    }

    pub fn video(reference: MediaRef) -> Self {
        Self {
            reference,
            media_type: MediaType::Video,
        }
    }
}

/// Result of the composite export step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Edited image, or the original when nothing was baked.
    pub media: MediaRef,
    /// Overlays were flattened into a new file.
    pub baked: bool,
    /// User-facing warning when edits could not be saved.
    pub warning: Option<String>,
}

impl ExportOutcome {
    /// The original media, untouched.
    pub fn unchanged(media: MediaRef) -> Self {
        Self {
            media,
            baked: false,
            warning: None,
        }
    }

    /// The original media after a failed export.
    pub fn fallback(media: MediaRef, warning: impl Into<String>) -> Self {
        Self {
            media,
            baked: false,
            warning: Some(warning.into()),
        }
    }

    pub fn baked(media: MediaRef) -> Self {
        Self {
            media,
            baked: true,
            warning: None,
        }
    }
}

/// What the editor hands to the send/post flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedMedia {
    pub media: MediaRef,
    pub media_type: MediaType,
    pub captions: Vec<Caption>,
    pub drawings: Vec<DrawingPath>,
    pub filter: Option<FilterKind>,
    pub warning: Option<String>,
}

impl EditedMedia {
    /// All caption text joined for the post's caption field.
    pub fn caption_text(&self) -> String {
        self.captions
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
