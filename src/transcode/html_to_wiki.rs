//! HTML to DokuWiki.
//!
//! This direction is a straight converter call. Wiki links and namespaces
//! are not re-patched here; the caller rewrites namespaces on the HTML
//! before conversion.

use super::converter::{ConvertError, Converter, Dialect};

/// Convert an HTML fragment to DokuWiki, trimming trailing whitespace.
pub fn html_to_wiki(converter: &dyn Converter, html: &str) -> Result<String, ConvertError> {
    let wiki = converter.convert(Dialect::Html, Dialect::DokuWiki, html)?;
    Ok(wiki.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Converter for Echo {
        fn convert(&self, from: Dialect, to: Dialect, text: &str) -> Result<String, ConvertError> {
            Ok(format!("{}>{}:{}\n\n  ", from, to, text))
        }
    }

    #[test]
    fn test_direction_and_trimming() {
        assert_eq!(html_to_wiki(&Echo, "<p>x</p>").unwrap(), "html>dokuwiki:<p>x</p>");
    }

    #[test]
    fn test_errors_propagate() {
        let err = html_to_wiki(&crate::transcode::BuiltinMarkdown, "<p>x</p>").unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { .. }));
    }
}
