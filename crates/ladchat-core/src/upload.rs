//! Upload hand-off: checks an edited media file against the server's media
//! rules before the host sends it as a multipart request.

use crate::media::{EditedMedia, MediaType};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Maximum photo upload size (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
/// Maximum video upload size (100 MiB).
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;
/// Server-side limit for the caption field.
pub const MAX_CAPTION_FIELD_CHARS: usize = 200;

/// Upload validation errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: u64, max: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for upload planning.
pub type UploadResult<T> = Result<T, UploadError>;

/// Multipart fields for a snap/story upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadPlan {
    pub file_path: PathBuf,
    pub content_type: &'static str,
    pub media_type: MediaType,
    pub caption: Option<String>,
    pub size: u64,
}

impl UploadPlan {
    /// Validate the edited media file and build the upload fields.
    pub fn from_edit(edit: &EditedMedia) -> UploadResult<Self> {
        let file_path = edit.media.to_path();
        let extension = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let content_type = content_type_for(&extension, edit.media_type)
            .ok_or_else(|| UploadError::UnsupportedType(extension.clone()))?;

        let size = std::fs::metadata(&file_path)?.len();
        let max = match edit.media_type {
            MediaType::Photo => MAX_IMAGE_BYTES,
            MediaType::Video => MAX_VIDEO_BYTES,
        };
        if size > max {
            return Err(UploadError::TooLarge { size, max });
        }

        let caption = edit.caption_text();
        let caption = (!caption.is_empty())
            .then(|| caption.chars().take(MAX_CAPTION_FIELD_CHARS).collect());

        Ok(Self {
            file_path,
            content_type,
            media_type: edit.media_type,
            caption,
            size,
        })
    }
}

fn content_type_for(extension: &str, media_type: MediaType) -> Option<&'static str> {
    match (media_type, extension) {
        (MediaType::Photo, "jpg" | "jpeg") => Some("image/jpeg"),
        (MediaType::Photo, "png") => Some("image/png"),
        (MediaType::Photo, "webp") => Some("image/webp"),
        (MediaType::Photo, "gif") => Some("image/gif"),
        (MediaType::Video, "mp4") => Some("video/mp4"),
        (MediaType::Video, "mov") => Some("video/quicktime"),
        (MediaType::Video, "avi") => Some("video/x-msvideo"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaRef;
    use tempfile::tempdir;

    fn edit(path: PathBuf, media_type: MediaType) -> EditedMedia {
        EditedMedia {
            media: MediaRef::from_path(path),
            media_type,
            captions: Vec::new(),
            drawings: Vec::new(),
            filter: None,
            warning: None,
        }
    }

    #[test]
    fn test_photo_plan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snap.JPG");
        std::fs::write(&path, [0u8; 64]).unwrap();

        let plan = UploadPlan::from_edit(&edit(path.clone(), MediaType::Photo)).unwrap();
        assert_eq!(plan.content_type, "image/jpeg");
        assert_eq!(plan.size, 64);
        assert_eq!(plan.caption, None);
        assert_eq!(plan.file_path, path);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, [0u8; 8]).unwrap();

        let result = UploadPlan::from_edit(&edit(path, MediaType::Photo));
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
    }

    #[test]
    fn test_missing_file() {
        let missing = edit(PathBuf::from("/nonexistent/a.png"), MediaType::Photo);
        let result = UploadPlan::from_edit(&missing);
        assert!(matches!(result, Err(UploadError::Io(_))));
    }

    #[test]
    fn test_too_large() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.png");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_IMAGE_BYTES + 1).unwrap();

        let result = UploadPlan::from_edit(&edit(path, MediaType::Photo));
        assert!(matches!(result, Err(UploadError::TooLarge { .. })));
    }
}
