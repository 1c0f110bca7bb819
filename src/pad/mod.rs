//! Pad service access.
//!
//! Pads are addressed by id and hold text that can be read as plain text or
//! HTML and written as HTML. [`EtherpadClient`] talks to a live Etherpad
//! server; [`MemoryPads`] keeps pads in memory.

mod etherpad;
mod memory;

pub use etherpad::{EtherpadClient, API_VERSION};
pub use memory::{html_to_text, MemoryPads};

use thiserror::Error;

/// Message Etherpad answers with when a pad id is unknown.
pub const PAD_NOT_FOUND_MESSAGE: &str = "padID does not exist";

#[derive(Error, Debug)]
pub enum PadError {
    #[error("padID does not exist: {0}")]
    NotFound(String),

    #[error("API key rejected: {0}")]
    Unauthorized(String),

    #[error("Etherpad API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PadError {
    /// Whether the pad simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PadError::NotFound(_))
    }
}

/// A store of pads keyed by pad id.
pub trait PadService {
    /// Plain text of a pad.
    fn get_text(&self, pad_id: &str) -> Result<String, PadError>;

    /// HTML rendering of a pad.
    fn get_html(&self, pad_id: &str) -> Result<String, PadError>;

    /// Replace a pad's content with HTML.
    fn set_html(&self, pad_id: &str, html: &str) -> Result<(), PadError>;

    /// Create an empty pad.
    fn create_pad(&self, pad_id: &str) -> Result<(), PadError>;

    fn delete_pad(&self, pad_id: &str) -> Result<(), PadError>;

    /// Whether a pad exists.
    fn pad_exists(&self, pad_id: &str) -> Result<bool, PadError> {
        match self.get_text(pad_id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
