//! In-memory pad store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{PadError, PadService};

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Reduce pad HTML to the plain text a pad would show: line breaks become
/// newlines, tags are dropped and entities decoded.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(html, "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, "");
    html_escape::decode_html_entities(&without_tags)
        .replace('\u{a0}', " ")
}

#[derive(Debug, Clone, Default)]
struct Pad {
    text: String,
    html: Option<String>,
}

/// Pads held in memory, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryPads {
    pads: RefCell<BTreeMap<String, Pad>>,
}

impl MemoryPads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a pad with plain text content.
    pub fn insert_text(&self, pad_id: impl Into<String>, text: impl Into<String>) {
        self.pads.borrow_mut().insert(
            pad_id.into(),
            Pad {
                text: text.into(),
                html: None,
            },
        );
    }

    /// Builder-style [`insert_text`](Self::insert_text).
    pub fn with_text(self, pad_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_text(pad_id, text);
        self
    }

    pub fn contains(&self, pad_id: &str) -> bool {
        self.pads.borrow().contains_key(pad_id)
    }

    /// The HTML last written to a pad, if any.
    pub fn stored_html(&self, pad_id: &str) -> Option<String> {
        self.pads.borrow().get(pad_id).and_then(|p| p.html.clone())
    }

    pub fn pad_ids(&self) -> Vec<String> {
        self.pads.borrow().keys().cloned().collect()
    }
}

impl PadService for MemoryPads {
    fn get_text(&self, pad_id: &str) -> Result<String, PadError> {
        self.pads
            .borrow()
            .get(pad_id)
            .map(|p| p.text.clone())
            .ok_or_else(|| PadError::NotFound(pad_id.to_string()))
    }

    fn get_html(&self, pad_id: &str) -> Result<String, PadError> {
        let pads = self.pads.borrow();
        let pad = pads
            .get(pad_id)
            .ok_or_else(|| PadError::NotFound(pad_id.to_string()))?;

        Ok(match &pad.html {
            Some(html) => html.clone(),
            None => format!(
                "<!DOCTYPE HTML><html><body>{}</body></html>",
                html_escape::encode_text(&pad.text).replace('\n', "<br>")
            ),
        })
    }

    fn set_html(&self, pad_id: &str, html: &str) -> Result<(), PadError> {
        let mut pads = self.pads.borrow_mut();
        let pad = pads
            .get_mut(pad_id)
            .ok_or_else(|| PadError::NotFound(pad_id.to_string()))?;

        pad.text = html_to_text(html);
        pad.html = Some(html.to_string());
        Ok(())
    }

    fn create_pad(&self, pad_id: &str) -> Result<(), PadError> {
        let mut pads = self.pads.borrow_mut();
        if pads.contains_key(pad_id) {
            return Err(PadError::Api {
                code: 1,
                message: "padID does already exist".to_string(),
            });
        }
        pads.insert(pad_id.to_string(), Pad::default());
        Ok(())
    }

    fn delete_pad(&self, pad_id: &str) -> Result<(), PadError> {
        self.pads
            .borrow_mut()
            .remove(pad_id)
            .map(|_| ())
            .ok_or_else(|| PadError::NotFound(pad_id.to_string()))
    }
}
