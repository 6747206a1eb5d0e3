//! Application error types

use crate::action::Effect;
use crate::metadata::DecodeError;
use app_fs::{ArchiveError, FileOpError};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error(transparent)]
    File(#[from] FileOpError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Action {0} is not available for this file")]
    Unavailable(Effect),

    // ===== Fatal Errors (application termination) =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::File(_) | AppError::Archive(_) | AppError::Decode(_) | AppError::Unavailable(_)
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::File(FileOpError::NotFound(path)) => {
                format!("File not found: {}", path.display())
            }
            AppError::File(FileOpError::AlreadyExists(path)) => {
                format!("A file named {} already exists", path.display())
            }
            AppError::File(FileOpError::PermissionDenied(path)) => {
                format!("Access denied: {}", path.display())
            }
            AppError::Archive(ArchiveError::UnrecognizedFormat(_)) => {
                "Unknown file format.".to_string()
            }
            AppError::Archive(ArchiveError::UnsupportedFormat(name)) => {
                format!("Cannot unpack {} archives", name)
            }
            AppError::Decode(e) => format!("Cannot display {}: not valid text", e.key),
            _ => self.to_string(),
        }
    }
}
