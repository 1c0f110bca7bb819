//! HTML to structured body.

use kuchikikiki::NodeRef;
use kuchikikiki::traits::TendrilSink;

use super::{BodyNode, ITEM_TAG, LIST_TAGS};

/// Reduce an HTML fragment to its top-level body nodes.
///
/// Text between top-level elements is dropped. Empty elements still produce
/// a node with empty text.
pub fn extract_body(html: &str) -> Vec<BodyNode> {
    let document = kuchikikiki::parse_html().one(html);

    let Ok(body) = document.select_first("body") else {
        return Vec::new();
    };

    body.as_node()
        .children()
        .filter_map(|child| extract_node(&child))
        .collect()
}

fn extract_node(node: &NodeRef) -> Option<BodyNode> {
    let element = node.as_element()?;
    let tag = element.name.local.to_string();

    if LIST_TAGS.contains(&tag.as_str()) {
        let items = node
            .children()
            .filter(|child| child.as_element().is_some())
            .map(|item| BodyNode::leaf(ITEM_TAG, item.text_contents()))
            .collect();

        Some(BodyNode::List { tag, items })
    } else {
        Some(BodyNode::leaf(tag, node.text_contents()))
    }
}
