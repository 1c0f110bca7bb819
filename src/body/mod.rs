//! Structured page bodies.
//!
//! A body is the flat sequence of top-level HTML elements of a page, each
//! reduced to its tag and its text. Lists keep one level of structure so
//! that their items survive as separate entries:
//!
//! ```json
//! [
//!   {"tag": "p", "text": "Welcome to tA."},
//!   {"tag": "ul", "items": [{"tag": "li", "text": "one"}, {"tag": "li", "text": "two"}]}
//! ]
//! ```

mod extract;
mod language;
mod render;

pub use extract::extract_body;
pub use language::LanguageRewrite;
pub use render::render_body;

use serde::{Deserialize, Serialize};

/// Tags whose children are emitted as list items.
pub const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Tag used for every list item.
pub const ITEM_TAG: &str = "li";

/// One top-level element of a page body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyNode {
    /// A list container and its items.
    List { tag: String, items: Vec<BodyNode> },
    /// Any other element, with its text flattened.
    Leaf { tag: String, text: String },
}

impl BodyNode {
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        BodyNode::Leaf {
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// A list whose items are built from the given texts.
    pub fn list<I, S>(tag: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BodyNode::List {
            tag: tag.into(),
            items: items
                .into_iter()
                .map(|text| BodyNode::leaf(ITEM_TAG, text))
                .collect(),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            BodyNode::List { tag, .. } | BodyNode::Leaf { tag, .. } => tag,
        }
    }
}
