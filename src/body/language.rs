//! Namespace substitutions for translated pages.
//!
//! Bodies exported from the English pads link into the `en:ta` namespace
//! and to `ta-*` pads. When a translation is imported, those references are
//! moved to the target language. The `namespace` header field is moved by
//! the import itself, since headers never pass through the rendered body.

/// Rewrites English namespace references into a target language.
#[derive(Debug, Clone)]
pub struct LanguageRewrite {
    replacements: Vec<(String, String)>,
}

impl LanguageRewrite {
    pub fn new(lang: &str) -> Self {
        let replacements = vec![
            ("&#x2F;p&#x2F;ta-".to_string(), format!("&#x2F;p&#x2F;{}-ta-", lang)),
            ("/p/ta-".to_string(), format!("/p/{}-ta-", lang)),
            ("[[en:ta:".to_string(), format!("[[{}:ta:", lang)),
            ("[[:en:ta:".to_string(), format!("[[:{}:ta:", lang)),
            (">en:ta:".to_string(), format!(">{}:ta:", lang)),
            ("[[en:ta|".to_string(), format!("[[{}:ta|", lang)),
            ("[[:en:ta|".to_string(), format!("[[:{}:ta|", lang)),
        ];

        Self { replacements }
    }

    /// Apply every substitution in order.
    pub fn apply(&self, html: &str) -> String {
        self.replacements
            .iter()
            .fold(html.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrites_wiki_links() {
        let rewrite = LanguageRewrite::new("fr");

        assert_eq!(
            rewrite.apply("<p>See [[en:ta:vol1:intro]] and [[:en:ta|tA]]</p>"),
            "<p>See [[fr:ta:vol1:intro]] and [[:fr:ta|tA]]</p>"
        );
    }

    #[test]
    fn test_rewrites_pad_links_and_namespace() {
        let rewrite = LanguageRewrite::new("es");

        assert_eq!(
            rewrite.apply("<p>en:ta:x</p> https://pad.door43.org/p/ta-intro"),
            "<p>es:ta:x</p> https://pad.door43.org/p/es-ta-intro"
        );
    }

    #[test]
    fn test_leaves_other_text_alone() {
        let rewrite = LanguageRewrite::new("de");
        assert_eq!(rewrite.apply("<p>english text</p>"), "<p>english text</p>");
    }
}
