use miette::Diagnostic;
use thiserror::Error;

use crate::pad::PadError;
use crate::transcode::ConvertError;

/// Main error type for ta-sync operations.
///
/// Everything here ends a run. Per-page problems are recorded on the
/// [`RunContext`](crate::sync::RunContext) instead.
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    #[diagnostic(code(ta_sync::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(ta_sync::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(ta_sync::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Could not log into Etherpad: {message}")]
    #[diagnostic(code(ta_sync::auth))]
    Auth {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Pad service error: {0}")]
    #[diagnostic(code(ta_sync::pad))]
    Pad(#[from] PadError),

    #[error("Conversion error: {0}")]
    #[diagnostic(code(ta_sync::convert))]
    Convert(#[from] ConvertError),

    #[error("Corpus error: {message}")]
    #[diagnostic(code(ta_sync::corpus))]
    Corpus {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Missing input: {message}")]
    #[diagnostic(code(ta_sync::input))]
    MissingInput {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
