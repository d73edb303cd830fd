use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for unpx operations
#[derive(Error, Diagnostic, Debug)]
pub enum UnpxError {
    #[error("IO error: {0}")]
    #[diagnostic(code(unpx::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(unpx::io))]
    Io { path: PathBuf, message: String },

    #[error("Unsupported metadata format '{format}'")]
    #[diagnostic(
        code(unpx::schema::unsupported_format),
        help("Supported formats are 'plist' and 'json'")
    )]
    UnsupportedFormat { format: String },

    #[error("Unrecognized sprite sheet schema: {message}")]
    #[diagnostic(code(unpx::schema::unrecognized))]
    UnrecognizedSchema {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(unpx::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Missing {missing} for sprite sheet '{base}'")]
    #[diagnostic(
        code(unpx::missing_companion),
        help("Keep the metadata file and its texture side by side")
    )]
    MissingCompanionFile { base: PathBuf, missing: PathBuf },

    #[error("Invalid geometry for sprite '{sprite}': {message}")]
    #[diagnostic(code(unpx::geometry))]
    InvalidGeometry { sprite: String, message: String },

    #[error("Failed to extract sprite '{sprite}': {message}")]
    #[diagnostic(code(unpx::extract))]
    Extract { sprite: String, message: String },

    #[error("{failed} of {total} sprite sheets failed")]
    #[diagnostic(code(unpx::batch))]
    Batch { failed: usize, total: usize },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(unpx::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl UnpxError {
    /// Shorthand for a parse error without help text.
    pub fn parse(message: impl Into<String>) -> Self {
        UnpxError::Parse {
            message: message.into(),
            help: None,
        }
    }

    /// Whether this error should abort a whole batch rather than one job.
    pub fn is_fatal(&self) -> bool {
        matches!(self, UnpxError::UnsupportedFormat { .. } | UnpxError::Config { .. })
    }
}

pub type Result<T> = std::result::Result<T, UnpxError>;
