//! Error types for the wn-app service layer.

use std::fmt;
use std::path::PathBuf;

use wn_client::ClientError;

/// Application error type shared by the CLI and the GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please upload an INP file first")]
    NoFileUploaded,

    #[error("Failed to read file")]
    FileRead {
        filename: String,
        source: std::io::Error,
    },

    #[error("Not an INP file: {0}")]
    NotInpFile(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to read preset file: {path}")]
    PresetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write preset file: {path}")]
    PresetWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Preset error: {0}")]
    Preset(String),

    #[error("Invalid image payload: {0}")]
    Image(String),

    #[error("Analysis error: {0}")]
    Analysis(ErrorNotice),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Bucket of the user-visible failure taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NoFileUploaded | AppError::NotInpFile(_) => ErrorKind::Validation,
            AppError::FileRead { .. } => ErrorKind::FileRead,
            AppError::Client(err) if err.is_transport() => ErrorKind::Transport,
            AppError::Client(_) => ErrorKind::Application,
            AppError::Analysis(notice) => notice.kind,
            AppError::PresetRead { .. }
            | AppError::PresetWrite { .. }
            | AppError::Preset(_)
            | AppError::Image(_)
            | AppError::Io(_) => ErrorKind::Local,
        }
    }

    pub fn notice(&self) -> ErrorNotice {
        ErrorNotice {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Result type for wn-app operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing input at submit time.
    Validation,
    /// Chosen file could not be read as text.
    FileRead,
    /// Remote call did not complete.
    Transport,
    /// Remote call completed and reported failure.
    Application,
    /// Local artifact handling (presets, exports, images).
    Local,
}

/// Content of the single user-visible message slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for ErrorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&AppError> for ErrorNotice {
    fn from(err: &AppError) -> Self {
        err.notice()
    }
}
