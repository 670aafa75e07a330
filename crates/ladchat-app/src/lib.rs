//! LadChat Editor Application
//!
//! Headless shell around the edit session: replays recorded user actions,
//! saves through the background exporter and prints the hand-off.

mod app;
pub mod script;

pub use app::App;
pub use script::{EditAction, EditScript};

use ladchat_core::config::ConfigError;
use ladchat_core::{SessionError, UploadError};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Script error: {0}")]
    Script(String),
    #[error("No caption at index {0}")]
    NoSuchCaption(usize),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
