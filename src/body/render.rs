//! Structured body back to HTML.
//!
//! Rendering is the inverse of [`extract_body`](super::extract_body):
//! extracting the rendered HTML again gives back the same nodes.

use super::BodyNode;

/// Elements that never take a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is not entity-decoded by the parser.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// Elements whose first newline the parser swallows.
const NEWLINE_EATING_TAGS: &[&str] = &["pre", "textarea", "listing"];

/// Render body nodes to an HTML fragment, one element per line.
pub fn render_body(nodes: &[BodyNode]) -> String {
    let mut html = String::new();
    for node in nodes {
        render_node(node, &mut html);
    }
    html
}

fn render_node(node: &BodyNode, out: &mut String) {
    match node {
        BodyNode::List { tag, items } => {
            out.push_str(&format!("<{}>\n", tag));
            for item in items {
                render_node(item, out);
            }
            out.push_str(&format!("</{}>\n", tag));
        }
        BodyNode::Leaf { tag, text } => render_leaf(tag, text, out),
    }
}

fn render_leaf(tag: &str, text: &str, out: &mut String) {
    let tag_lower = tag.to_ascii_lowercase();
    let tag_lower = tag_lower.as_str();

    if VOID_TAGS.contains(&tag_lower) {
        out.push_str(&format!("<{}>\n", tag));
        return;
    }

    if tag_lower == "plaintext" {
        // Everything after the start tag is plaintext content, so there is no
        // end tag and no trailing newline.
        out.push_str(&format!("<{}>{}", tag, text));
        return;
    }

    let content = if RAW_TEXT_TAGS.contains(&tag_lower) {
        text.to_string()
    } else {
        html_escape::encode_text(text).into_owned()
    };

    if tag_lower == "table" {
        // Tables cannot hold bare text; the parser would move it out.
        out.push_str(&format!("<table><tr><td>{}</td></tr></table>\n", content));
        return;
    }

    let lead = if NEWLINE_EATING_TAGS.contains(&tag_lower) && content.starts_with('\n') {
        "\n"
    } else {
        ""
    };

    out.push_str(&format!("<{}>{}{}</{}>\n", tag, lead, content, tag));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::extract_body;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_leaf_and_list() {
        let nodes = vec![
            BodyNode::leaf("p", "Hello"),
            BodyNode::list("ul", ["a", "b"]),
        ];

        assert_eq!(
            render_body(&nodes),
            "<p>Hello</p>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_escapes_text() {
        insta::assert_snapshot!(
            render_body(&[BodyNode::leaf("p", "1 < 2 & 3 > 2")]).trim_end(),
            @"<p>1 &lt; 2 &amp; 3 &gt; 2</p>"
        );
    }

    #[test]
    fn test_render_plaintext_has_no_end_tag() {
        assert_eq!(
            render_body(&[BodyNode::leaf("p", "x"), BodyNode::leaf("plaintext", "a < b")]),
            "<p>x</p>\n<plaintext>a < b"
        );
    }

    #[test]
    fn test_render_void_element() {
        assert_eq!(render_body(&[BodyNode::leaf("hr", "")]), "<hr>\n");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let html = "\
<h1 id=\"intro\">Introduction</h1>
<p>Text with <strong>bold</strong>, <em>emphasis</em> &amp; a <a href=\"https://door43.org/en/ta\">link</a>.</p>
<ul>
<li>first &lt;item&gt;</li>
<li>second <code>item</code></li>
</ul>
<ol><li>one</li><li>two<ul><li>nested</li></ul></li></ol>
<blockquote><p>Quoted</p></blockquote>
<pre><code>

indented code</code></pre>
<hr />
<table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>
<p></p>
<script>if (a < b) { run(); }</script>
<plaintext>a < b";

        let first = extract_body(html);
        let second = extract_body(&render_body(&first));

        assert_eq!(first, second);
        assert_eq!(first.len(), 11);
        assert_eq!(first[10], BodyNode::leaf("plaintext", "a < b"));
    }
}
