use crate::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AngeError {
    // Input errors
    #[error("INPUT_NOT_FOUND: input path does not exist ({0})")]
    InputNotFound(String),

    #[error("INPUT_INVALID: input is neither a directory nor a file ({0})")]
    InvalidInput(String),

    #[error("INPUT_PATTERN_INVALID: '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Per-file errors
    #[error("IO_ERROR: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RENDER_FAILED: {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    // Config errors
    #[error("CONFIG_READ_ERROR: {}: {reason}", path.display())]
    ConfigRead { path: PathBuf, reason: String },

    #[error("CONFIG_INVALID: failed to parse {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    // Watch errors
    #[error("WATCH_FAILED: {0}")]
    Watch(String),
}

impl AngeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AngeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors that end the whole invocation rather than a single file
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            AngeError::InputNotFound(_)
                | AngeError::InvalidInput(_)
                | AngeError::InvalidPattern { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AngeError>;
