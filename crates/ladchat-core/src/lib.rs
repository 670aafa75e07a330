//! LadChat Editor Core
//!
//! Platform-agnostic data structures and logic for the post-capture media
//! editor: captions, freehand drawings, filters and the edit session that
//! ties them together.

pub mod auth;
pub mod config;
pub mod filter;
pub mod gesture;
pub mod input;
pub mod media;
pub mod overlay;
pub mod palette;
pub mod session;
pub mod upload;

pub use config::{ConfigError, EditorConfig, OutputFormat};
pub use filter::{FilterKind, FilterRecipe, FilterSelection, FilterSelector};
pub use gesture::{GestureState, GestureTracker};
pub use input::PointerEvent;
pub use media::{CapturedMedia, EditedMedia, ExportOutcome, MediaRef, MediaType};
pub use overlay::{Caption, CaptionId, DrawingId, DrawingPath, OverlayStore};
pub use palette::{PaletteColor, Rgba8};
pub use session::{
    EXPORT_FALLBACK_WARNING, EditMode, EditSession, ExportRequest, Notice, SessionError,
    SessionResult, ToolSettings,
};
pub use upload::{UploadError, UploadPlan};
