//! Edit session controller.
//!
//! One session exists per captured media item. It owns the overlay store,
//! the filter selection and the gesture tracker, and routes user actions to
//! them according to the single active editing mode.

use crate::config::EditorConfig;
use crate::filter::{FilterKind, FilterSelection, FilterSelector};
use crate::gesture::GestureTracker;
use crate::input::PointerEvent;
use crate::media::{CapturedMedia, EditedMedia, ExportOutcome, MediaType};
use crate::overlay::{Caption, CaptionId, DrawingPath, OverlayStore};
use crate::palette::PaletteColor;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Warning shown when the composite step fell back to the original.
pub const EXPORT_FALLBACK_WARNING: &str = "Some edits may not be saved";

/// Editing modes. Only one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    None,
    Caption,
    Draw,
    Filter,
}

/// Message queued for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Lightweight hint; the action was ignored.
    Advisory(String),
    /// Must be acknowledged; the action did not proceed.
    Blocking(String),
}

/// Session controller errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Save is only available when no tool is active (current: {0:?})")]
    SaveUnavailable(EditMode),
    #[error("A save is already in progress")]
    SaveInProgress,
    #[error("No save in progress")]
    NoSaveInProgress,
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Current caption and drawing tool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    pub caption_color: PaletteColor,
    pub caption_background: bool,
    pub draw_color: PaletteColor,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            caption_color: PaletteColor::White,
            caption_background: true,
            draw_color: PaletteColor::Red,
        }
    }
}

/// Owned snapshot of everything the exporter needs.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: CapturedMedia,
    pub captions: Vec<Caption>,
    pub drawings: Vec<DrawingPath>,
    pub filter: Option<FilterKind>,
    pub config: Arc<EditorConfig>,
}

impl ExportRequest {
    /// Check if anything would be drawn over the base media.
    pub fn has_overlays(&self) -> bool {
        !self.captions.is_empty() || !self.drawings.is_empty() || self.filter.is_some()
    }
}

/// State of one capture's editing interaction.
#[derive(Debug)]
pub struct EditSession {
    media: CapturedMedia,
    config: Arc<EditorConfig>,
    mode: EditMode,
    overlays: OverlayStore,
    filters: FilterSelector,
    gestures: GestureTracker,
    tools: ToolSettings,
    /// An export is in flight; save and input are disabled.
    saving: bool,
    /// The destructive "clear all" confirmation is showing.
    clear_prompt_open: bool,
    notices: Vec<Notice>,
}

impl EditSession {
    pub fn new(media: CapturedMedia, config: Arc<EditorConfig>) -> Self {
        log::info!(
            "Edit session started for {:?} {}",
            media.media_type,
            media.reference
        );
        Self {
            overlays: OverlayStore::new(&config),
            gestures: GestureTracker::new(config.drag_threshold),
            media,
            config,
            mode: EditMode::None,
            filters: FilterSelector::new(),
            tools: ToolSettings::default(),
            saving: false,
            clear_prompt_open: false,
            notices: Vec::new(),
        }
    }

    pub fn media(&self) -> &CapturedMedia {
        &self.media
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn overlays(&self) -> &OverlayStore {
        &self.overlays
    }

    pub fn active_filter(&self) -> Option<FilterKind> {
        self.filters.active()
    }

    pub fn tools(&self) -> ToolSettings {
        self.tools
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn gestures(&self) -> &GestureTracker {
        &self.gestures
    }

    /// Check if any overlay or filter has been applied.
    pub fn has_edits(&self) -> bool {
        !self.overlays.is_empty() || self.filters.active().is_some()
    }

    /// Tool button: switch to a mode, dropping any in-progress gesture.
    pub fn enter_mode(&mut self, mode: EditMode) -> bool {
        if self.saving {
            return false;
        }
        if mode == EditMode::Filter && self.media.media_type == MediaType::Video {
            self.advise("Filters are only available for photos");
            return false;
        }
        if mode != self.mode {
            log::debug!("Edit mode {:?} -> {:?}", self.mode, mode);
        }
        self.gestures.cancel();
        self.mode = mode;
        true
    }

    /// "Done" inside a tool returns to no mode.
    pub fn done(&mut self) {
        self.enter_mode(EditMode::None);
    }

    pub fn set_caption_color(&mut self, color: PaletteColor) {
        self.tools.caption_color = color;
    }

    /// Returns the new background flag.
    pub fn toggle_caption_background(&mut self) -> bool {
        self.tools.caption_background = !self.tools.caption_background;
        self.tools.caption_background
    }

    pub fn set_draw_color(&mut self, color: PaletteColor) {
        self.tools.draw_color = color;
    }

    /// Submit caption text typed in caption mode.
    pub fn submit_caption(&mut self, text: &str) -> Option<CaptionId> {
        if self.mode != EditMode::Caption {
            self.advise("Tap the text tool to add a caption");
            return None;
        }
        let tools = self.tools;
        self.overlays
            .add_caption(text, tools.caption_color, tools.caption_background)
            .map(Caption::id)
    }

    /// Pick a filter (None = original).
    pub fn select_filter(&mut self, filter: Option<FilterKind>) -> FilterSelection {
        let result = self.filters.select(filter, self.media.media_type);
        if result == FilterSelection::RejectedForVideo {
            self.advise("Filters are only available for photos");
        }
        result
    }

    /// Route a pointer event to drawing or caption gestures.
    /// Returns true if the event changed session state.
    ///
    /// In draw mode every event feeds the stroke, so captions can only be
    /// dragged or long-pressed outside draw mode.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if self.saving || self.clear_prompt_open {
            return false;
        }
        if self.mode == EditMode::Draw {
            self.handle_draw_pointer(event)
        } else {
            self.handle_caption_pointer(event)
        }
    }

    fn handle_draw_pointer(&mut self, event: PointerEvent) -> bool {
        let frame = self.config.preview_rect();
        match event {
            PointerEvent::Down { position } => self.gestures.begin_stroke(position, frame),
            PointerEvent::Move { position } => {
                let active = self.gestures.live_stroke().is_some();
                self.gestures.extend_stroke(position, frame);
                active
            }
            PointerEvent::Up { position } => {
                let Some(points) = self.gestures.end_stroke(position, frame) else {
                    return false;
                };
                let color = self.tools.draw_color;
                self.overlays
                    .add_drawing(points, color, self.config.stroke_width)
                    .is_some()
            }
            PointerEvent::Cancel => {
                let active = self.gestures.is_active();
                self.gestures.cancel();
                active
            }
            PointerEvent::LongPress { .. } => false,
        }
    }

    fn handle_caption_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position } => {
                let Some(caption) = self
                    .overlays
                    .caption_at(position)
                    .and_then(|id| self.overlays.caption(id))
                else {
                    return false;
                };
                self.gestures
                    .begin_caption_drag(caption.id(), caption.position, position);
                true
            }
            PointerEvent::Move { position } => {
                self.gestures.update_caption_drag(position).is_some()
            }
            PointerEvent::Up { position } => match self.gestures.end_caption_drag(position) {
                Some((id, target)) => self
                    .overlays
                    .update_caption_position(id, target.x, target.y)
                    .is_some(),
                None => false,
            },
            PointerEvent::Cancel => {
                let active = self.gestures.is_active();
                self.gestures.cancel();
                active
            }
            PointerEvent::LongPress { position } => {
                self.gestures.cancel();
                match self.overlays.caption_at(position) {
                    Some(id) => self.overlays.remove_caption(id),
                    None => false,
                }
            }
        }
    }

    /// Where a caption should be drawn this frame (committed + live drag).
    pub fn caption_render_position(&self, id: CaptionId) -> Option<Point> {
        let caption = self.overlays.caption(id)?;
        Some(caption.position + self.gestures.live_offset(id))
    }

    /// Points of the stroke currently being drawn.
    pub fn live_stroke(&self) -> Option<&[Point]> {
        self.gestures.live_stroke()
    }

    pub fn undo_last_drawing(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.overlays.undo_last_drawing().is_some()
    }

    /// Ask for the destructive confirmation. Returns false if there is
    /// nothing to clear.
    pub fn request_clear_all(&mut self) -> bool {
        if self.saving || !self.has_edits() {
            return false;
        }
        self.clear_prompt_open = true;
        true
    }

    pub fn is_clear_prompt_open(&self) -> bool {
        self.clear_prompt_open
    }

    /// Confirmed: drop every caption, drawing and the filter at once.
    pub fn confirm_clear_all(&mut self) -> bool {
        if !self.clear_prompt_open {
            return false;
        }
        self.clear_prompt_open = false;
        self.gestures.cancel();
        self.overlays.clear_all();
        self.filters.clear();
        log::info!("Cleared all edits");
        true
    }

    pub fn cancel_clear_all(&mut self) {
        self.clear_prompt_open = false;
    }

    /// Start saving. Only available with no tool active.
    pub fn begin_save(&mut self) -> SessionResult<ExportRequest> {
        if self.saving {
            return Err(SessionError::SaveInProgress);
        }
        if self.mode != EditMode::None {
            return Err(SessionError::SaveUnavailable(self.mode));
        }
        self.gestures.cancel();
        self.saving = true;
        log::info!(
            "Saving edit: {} captions, {} drawings, filter {:?}",
            self.overlays.captions().len(),
            self.overlays.drawings().len(),
            self.filters.active()
        );
        Ok(ExportRequest {
            source: self.media.clone(),
            captions: self.overlays.captions().to_vec(),
            drawings: self.overlays.drawings().to_vec(),
            filter: self.filters.active(),
            config: Arc::clone(&self.config),
        })
    }

    /// Finish saving with the exporter's outcome and build the hand-off.
    pub fn complete_save(&mut self, outcome: ExportOutcome) -> SessionResult<EditedMedia> {
        if !self.saving {
            return Err(SessionError::NoSaveInProgress);
        }
        self.saving = false;
        if let Some(warning) = &outcome.warning {
            self.advise(warning.clone());
        }
        log::info!("Save finished: {} (baked: {})", outcome.media, outcome.baked);
        Ok(EditedMedia {
            media: outcome.media,
            media_type: self.media.media_type,
            captions: self.overlays.captions().to_vec(),
            drawings: self.overlays.drawings().to_vec(),
            filter: self.filters.active(),
            warning: outcome.warning,
        })
    }

    /// Discard the session to capture again.
    pub fn retake(self) {
        log::info!("Edit session discarded (retake)");
    }

    /// Discard the session and leave the editor.
    pub fn close(self) {
        log::info!("Edit session discarded (close)");
    }

    /// Queue a notice from the host (e.g. a permission denial).
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn advise(&mut self, message: impl Into<String>) {
        self.notices.push(Notice::Advisory(message.into()));
    }
}
