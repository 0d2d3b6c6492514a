//! Error types.
//!
//! Library code returns [`EasyDataError`]; the binary converts it into an
//! [`AppError`] carrying the process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the client can report to a caller.
#[derive(Debug, Error)]
pub enum EasyDataError {
    #[error("Invalid API key: {0}")]
    CredentialValidation(String),

    #[error("No EasyData API key entered for the current session.")]
    MissingCredential,

    #[error("Invalid format '{0}'. Supported formats are 'json' and 'csv'.")]
    InvalidFormat(String),

    #[error("Invalid series id '{0}': it must be non-empty and contain no '/', '\\' or '..'.")]
    InvalidSeriesId(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request error: {0}")]
    Transport(String),

    #[error("Failed to parse payload: {0}")]
    Parse(String),

    #[error("Missing required column: `{0}`")]
    MissingColumn(String),

    #[error("Invalid observation date '{value}' in data row {row}")]
    DateParse { row: usize, value: String },

    #[error("Invalid observation value '{value}' in data row {row}")]
    ValueParse { row: usize, value: String },

    #[error("I/O error on '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("Series has no observations to plot.")]
    EmptySeries,

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl EasyDataError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Exit code used by the binary for this class of failure.
    ///
    /// - 2: bad input (key, format, series id)
    /// - 3: bad data (payload, schema, dates, values, empty series)
    /// - 4: runtime failures (network, HTTP status, filesystem, rendering)
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CredentialValidation(_)
            | Self::MissingCredential
            | Self::InvalidFormat(_)
            | Self::InvalidSeriesId(_) => 2,
            Self::Parse(_)
            | Self::MissingColumn(_)
            | Self::DateParse { .. }
            | Self::ValueParse { .. }
            | Self::EmptySeries => 3,
            Self::Http { .. } | Self::Transport(_) | Self::Io { .. } | Self::Render(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EasyDataError> for AppError {
    fn from(err: EasyDataError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
