//! Application state: one edit session plus the export job that saves it.

use crate::script::{EditAction, EditScript};
use crate::{AppError, AppResult};
use kurbo::Point;
use ladchat_core::{
    CapturedMedia, EditMode, EditSession, EditedMedia, EditorConfig, FilterKind, Notice,
    PointerEvent,
};
use ladchat_render::ExportJob;
use std::sync::Arc;

/// Headless editor application.
pub struct App {
    session: EditSession,
    /// Notices shown to the user so far.
    notices: Vec<Notice>,
}

impl App {
    pub fn new(media: CapturedMedia, config: EditorConfig) -> Self {
        Self {
            session: EditSession::new(media, Arc::new(config)),
            notices: Vec::new(),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Replay every action of a script in order.
    pub fn run_script(&mut self, script: &EditScript) -> AppResult<()> {
        for action in &script.actions {
            self.apply(action)?;
        }
        Ok(())
    }

    /// Perform one user action.
    pub fn apply(&mut self, action: &EditAction) -> AppResult<()> {
        log::debug!("Applying {:?}", action);
        match action {
            EditAction::EnterMode { mode } => {
                self.session.enter_mode(*mode);
            }
            EditAction::Done => self.session.done(),
            EditAction::Caption { text } => {
                self.session.submit_caption(text);
            }
            EditAction::CaptionColor { color } => self.session.set_caption_color(*color),
            EditAction::ToggleBackground => {
                self.session.toggle_caption_background();
            }
            EditAction::DrawColor { color } => self.session.set_draw_color(*color),
            EditAction::Stroke { points } => self.stroke(points),
            EditAction::Drag { caption, to } => self.drag(*caption, *to)?,
            EditAction::LongPress { position } => {
                let position = *position;
                self.session.handle_pointer(PointerEvent::Down { position });
                self.session.handle_pointer(PointerEvent::LongPress { position });
                self.session.handle_pointer(PointerEvent::Up { position });
            }
            EditAction::Pointer { event } => {
                self.session.handle_pointer(*event);
            }
            EditAction::Filter { name } => {
                let filter = FilterKind::parse(name).map_err(AppError::Script)?;
                self.session.select_filter(filter);
            }
            EditAction::Undo => {
                self.session.undo_last_drawing();
            }
            EditAction::ClearAll { confirm } => {
                if self.session.request_clear_all() {
                    if *confirm {
                        self.session.confirm_clear_all();
                    } else {
                        self.session.cancel_clear_all();
                    }
                }
            }
        }
        self.collect_notices();
        Ok(())
    }

    fn stroke(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.session
            .handle_pointer(PointerEvent::Down { position: *first });
        for p in rest {
            self.session.handle_pointer(PointerEvent::Move { position: *p });
        }
        let last = rest.last().unwrap_or(first);
        self.session.handle_pointer(PointerEvent::Up { position: *last });
    }

    fn drag(&mut self, index: usize, to: Point) -> AppResult<()> {
        let from = self
            .session
            .overlays()
            .captions()
            .get(index)
            .map(|c| c.position)
            .ok_or(AppError::NoSuchCaption(index))?;
        self.session.handle_pointer(PointerEvent::Down { position: from });
        self.session.handle_pointer(PointerEvent::Move {
            position: from.midpoint(to),
        });
        self.session.handle_pointer(PointerEvent::Up { position: to });
        Ok(())
    }

    fn collect_notices(&mut self) {
        for notice in self.session.take_notices() {
            match &notice {
                Notice::Advisory(message) => log::warn!("{}", message),
                Notice::Blocking(message) => log::error!("{}", message),
            }
            self.notices.push(notice);
        }
    }

    /// Leave any tool, export on a background thread and hand off the result.
    pub fn save(&mut self) -> AppResult<EditedMedia> {
        if self.session.mode() != EditMode::None {
            self.session.done();
        }
        let request = self.session.begin_save()?;
        let job = ExportJob::spawn(request);
        let outcome = job.wait();
        let edited = self.session.complete_save(outcome)?;
        self.collect_notices();
        Ok(edited)
    }
}
