//! Edit scripts: a recorded list of user actions replayed against a session.

use kurbo::Point;
use ladchat_core::{EditMode, PaletteColor, PointerEvent};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    /// Tap a tool button.
    EnterMode { mode: EditMode },
    /// Tap "Done" inside a tool.
    Done,
    /// Type and submit caption text (caption mode).
    Caption { text: String },
    CaptionColor { color: PaletteColor },
    ToggleBackground,
    DrawColor { color: PaletteColor },
    /// Draw one stroke through the points (draw mode).
    Stroke { points: Vec<Point> },
    /// Drag the caption at `caption` (creation order) so its center lands on `to`.
    Drag { caption: usize, to: Point },
    LongPress { position: Point },
    /// Raw pointer event.
    Pointer { event: PointerEvent },
    /// Filter name; "none" or "original" clears.
    Filter { name: String },
    Undo,
    /// Clear everything; `confirm: false` dismisses the prompt instead.
    ClearAll {
        #[serde(default = "default_confirm")]
        confirm: bool,
    },
}

fn default_confirm() -> bool {
    true
}

/// Actions in the order they were performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditScript {
    pub actions: Vec<EditAction>,
}

impl EditScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a script file.
    pub fn load(path: &Path) -> crate::AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}
