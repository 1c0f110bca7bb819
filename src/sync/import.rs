//! Corpus to pads.
//!
//! Writes a translated corpus back into a language's pads. Pages are matched
//! to pads by slug through the language's own index pad. Each matched pad
//! gets the translated title and question merged into its header and its
//! body replaced by the corpus body converted back to DokuWiki.

use log::debug;
use serde_yaml::Value;

use crate::body::{render_body, LanguageRewrite};
use crate::corpus::{Corpus, CorpusPage};
use crate::error::Result;
use crate::pad::{PadError, PadService};
use crate::parser::{PageHeader, Section};
use crate::transcode::{html_to_wiki, Converter};

use super::page::{fetch_page, load_index, MissingPad, PadPage};
use super::RunContext;

/// Where and how to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Target language code, e.g. `fr`.
    pub lang: String,
    /// Index pad name without the language prefix.
    pub index_pad: String,
    /// Delete and recreate language pads that already exist.
    pub recreate: bool,
}

impl ImportOptions {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            index_pad: "ta-modules".to_string(),
            recreate: false,
        }
    }

    /// The language's index pad, e.g. `fr-ta-modules`.
    pub fn index_pad_id(&self) -> String {
        format!("{}-{}", self.lang, self.index_pad)
    }
}

/// What an import run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub updated: usize,
    pub unmatched: usize,
}

/// Import a corpus into the pads of `options.lang`.
///
/// Only an unreadable index fails the import.
pub fn import_corpus(
    pads: &dyn PadService,
    converter: &dyn Converter,
    corpus: &Corpus,
    options: &ImportOptions,
    ctx: &mut RunContext,
) -> Result<ImportSummary> {
    let sections = load_index(pads, &options.index_pad_id())?;
    let mut pad_pages = load_pad_pages(pads, &sections, ctx);
    let rewrite = LanguageRewrite::new(&options.lang);
    let mut summary = ImportSummary::default();

    for json_page in corpus.pages() {
        let Some(slug) = json_page.slug() else {
            ctx.error("Page in corpus has no slug");
            summary.unmatched += 1;
            continue;
        };

        let Some(pad_page) = find_by_slug(&mut pad_pages, slug) else {
            ctx.error(format!("Page \"{}\" not found in etherpad.", slug));
            summary.unmatched += 1;
            continue;
        };

        if import_page(pads, converter, &rewrite, pad_page, json_page, options, ctx) {
            summary.updated += 1;
        }
    }

    Ok(summary)
}

/// Fetch every pad listed in the sections. Missing pads are skipped.
pub fn load_pad_pages(
    pads: &dyn PadService,
    sections: &[Section],
    ctx: &mut RunContext,
) -> Vec<PadPage> {
    let mut pages = Vec::new();

    for section in sections {
        for pad_id in &section.pad_ids {
            ctx.heading(
                "Retrieving",
                &format!("{}:{}", section.name.to_lowercase(), pad_id),
            );
            if let Some(page) = fetch_page(pads, &section.name, pad_id, MissingPad::Skip, ctx) {
                pages.push(page);
            }
        }
    }

    pages
}

/// The first pad page whose slug matches.
pub fn find_by_slug<'p>(pages: &'p mut [PadPage], slug: &str) -> Option<&'p mut PadPage> {
    let slug = slug.trim();
    pages.iter_mut().find(|p| p.header.slug() == Some(slug))
}

/// Copy the translated question and title into a pad header.
///
/// Blank translations leave the existing value alone.
pub fn merge_translation(header: &mut PageHeader, page: &CorpusPage) {
    if let Some(question) = page.question().filter(|q| !q.is_empty()) {
        header.set_question(question);
    }
    if let Some(title) = page.title().filter(|t| !t.is_empty()) {
        header.set_title(title);
    }
}

/// Move an English `namespace` header field to the target language.
pub fn localize_namespace(header: &mut PageHeader, lang: &str) {
    if header.get_str("namespace").map(str::trim) == Some("en") {
        header.insert("namespace", Value::String(lang.to_string()));
    }
}

fn import_page(
    pads: &dyn PadService,
    converter: &dyn Converter,
    rewrite: &LanguageRewrite,
    pad_page: &mut PadPage,
    json_page: &CorpusPage,
    options: &ImportOptions,
    ctx: &mut RunContext,
) -> bool {
    ctx.note("Updating", &pad_page.pad_id);
    merge_translation(&mut pad_page.header, json_page);
    localize_namespace(&mut pad_page.header, &options.lang);

    let html = rewrite.apply(&render_body(&json_page.body));
    let wiki = match html_to_wiki(converter, &html) {
        Ok(wiki) => wiki,
        Err(e) => {
            ctx.error(format!("{}: {}", pad_page.pad_id, e));
            return false;
        }
    };
    let pad_html = build_pad_html(&pad_page.header, &wiki);

    let written = ensure_pad_id(pads, &pad_page.pad_id, &options.lang, options.recreate)
        .and_then(|pad_id| pads.set_html(&pad_id, &pad_html).map(|()| pad_id));

    match written {
        Ok(pad_id) => {
            debug!("wrote {} ({} bytes)", pad_id, pad_html.len());
            true
        }
        Err(e) => {
            ctx.error(format!("{}: {}", pad_page.pad_id, e));
            false
        }
    }
}

/// Make sure the pad id carries the language prefix and the pad exists.
///
/// Returns the id to write to.
pub fn ensure_pad_id(
    pads: &dyn PadService,
    current_id: &str,
    lang: &str,
    recreate: bool,
) -> std::result::Result<String, PadError> {
    let prefix = format!("{}-", lang);
    if current_id.starts_with(&prefix) {
        return Ok(current_id.to_string());
    }

    let pad_id = format!("{}{}", prefix, current_id);
    let exists = pads.pad_exists(&pad_id)?;

    if exists && recreate {
        debug!("recreating {}", pad_id);
        pads.delete_pad(&pad_id)?;
        pads.create_pad(&pad_id)?;
    } else if !exists {
        debug!("creating {}", pad_id);
        pads.create_pad(&pad_id)?;
    }

    Ok(pad_id)
}

/// Build the HTML written to a pad: the header block, then the escaped
/// DokuWiki body.
///
/// Newlines become `<br>` and every non-ASCII character is written as a
/// numeric character reference.
pub fn build_pad_html(header: &PageHeader, wiki: &str) -> String {
    let mut html = String::from("<!DOCTYPE HTML><html><body>---&nbsp;<br>");

    for (key, value) in header.iter() {
        html.push_str("<strong>");
        html.push_str(key);
        html.push_str(":</strong> ");
        html.push_str(&header_value_text(value));
        html.push_str("<br>");
    }

    html.push_str("---&nbsp;<br><br>");
    html.push_str(&html_escape::encode_text(wiki));
    html.push_str("<br></body></html>");

    encode_non_ascii(&html.replace('\n', "<br>"))
}

/// Render a header value the way pad headers write it.
pub fn header_value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|item| format!("\"{}\"", header_value_text(item)))
                .collect();
            format!("[{}]", items.join(","))
        }
        Value::Mapping(_) => serde_json::to_string(value).unwrap_or_default(),
        Value::Tagged(tagged) => header_value_text(&tagged.value),
    }
}

/// Replace every non-ASCII character with a `&#N;` reference.
pub fn encode_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&format!("&#{};", c as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyNode;
    use crate::corpus::Manual;
    use crate::pad::MemoryPads;
    use crate::transcode::{ConvertError, Dialect};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    /// Strips tags instead of running pandoc.
    struct StripTags;

    impl Converter for StripTags {
        fn convert(&self, _from: Dialect, _to: Dialect, text: &str) -> std::result::Result<String, ConvertError> {
            Ok(crate::pad::html_to_text(text))
        }
    }

    const FR_INDEX: &str = "Modules\n====== Introduction ======\n  * https://door43.org/p/ta-intro\n  * https://door43.org/p/ta-gone\n";

    const FR_INTRO: &str = "---\ntitle: Introduction to tA\nmanual: Introduction\nslug: intro\nvolume: 1\n---\nWelcome to tA.\n";

    fn corpus_page(fields: &[(&str, &str)], body: Vec<BodyNode>) -> CorpusPage {
        let fields: BTreeMap<_, _> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        CorpusPage { fields, body }
    }

    fn corpus(pages: Vec<CorpusPage>) -> Corpus {
        Corpus {
            timestamp: "2016-01-01 00:00 UTC".to_string(),
            manuals: vec![Manual {
                name: "Introduction".to_string(),
                pages,
            }],
        }
    }

    #[test]
    fn test_import_creates_language_pad() {
        let pads = MemoryPads::new()
            .with_text("fr-ta-modules", FR_INDEX)
            .with_text("ta-intro", FR_INTRO);
        let corpus = corpus(vec![corpus_page(
            &[("slug", "intro"), ("title", "Introduction à tA"), ("question", "")],
            vec![BodyNode::leaf("p", "Bienvenue")],
        )]);
        let mut ctx = RunContext::silent();

        let summary = import_corpus(&pads, &StripTags, &corpus, &ImportOptions::new("fr"), &mut ctx).unwrap();

        assert_eq!(summary, ImportSummary { updated: 1, unmatched: 0 });
        assert_eq!(ctx.error_count(), 0);

        let html = pads.stored_html("fr-ta-intro").unwrap();
        assert!(html.starts_with("<!DOCTYPE HTML><html><body>---&nbsp;<br>"));
        assert!(html.contains("<strong>title:</strong> Introduction &#224; tA<br>"));
        assert!(!html.contains("question"));
        assert!(html.contains("Bienvenue"));
        assert!(pads.stored_html("ta-intro").is_none());
    }

    #[test]
    fn test_unmatched_slug_is_an_error() {
        let pads = MemoryPads::new()
            .with_text("fr-ta-modules", FR_INDEX)
            .with_text("ta-intro", FR_INTRO);
        let corpus = corpus(vec![corpus_page(&[("slug", "nowhere")], vec![])]);
        let mut ctx = RunContext::silent();

        let summary = import_corpus(&pads, &StripTags, &corpus, &ImportOptions::new("fr"), &mut ctx).unwrap();

        assert_eq!(summary.unmatched, 1);
        assert_eq!(ctx.error_count(), 1);
    }

    #[test]
    fn test_missing_pads_are_skipped_silently() {
        let pads = MemoryPads::new().with_text("ta-intro", FR_INTRO);
        let sections = crate::parser::parse_index(FR_INDEX);
        let mut ctx = RunContext::silent();

        let pages = load_pad_pages(&pads, &sections, &mut ctx);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].pad_id, "ta-intro");
        assert_eq!(ctx.error_count(), 0);
    }

    #[test]
    fn test_missing_language_index_fails() {
        let pads = MemoryPads::new();
        let mut ctx = RunContext::silent();
        assert!(import_corpus(&pads, &StripTags, &corpus(vec![]), &ImportOptions::new("fr"), &mut ctx).is_err());
    }

    #[test]
    fn test_merge_translation() {
        let mut header = PageHeader::new();
        header.insert("title", Value::String("Old".into()));
        header.insert("question", Value::String("Old?".into()));

        merge_translation(
            &mut header,
            &corpus_page(&[("title", "Nouveau"), ("question", "")], vec![]),
        );

        assert_eq!(header.title(), Some("Nouveau"));
        assert_eq!(header.get_str("question"), Some("Old?"));
    }

    #[test]
    fn test_localize_namespace() {
        let mut header = PageHeader::new();
        header.insert("namespace", Value::String("en".into()));
        localize_namespace(&mut header, "fr");
        assert_eq!(header.get_str("namespace"), Some("fr"));

        let mut other = PageHeader::new();
        other.insert("namespace", Value::String("es".into()));
        localize_namespace(&mut other, "fr");
        assert_eq!(other.get_str("namespace"), Some("es"));
    }

    #[test]
    fn test_import_writes_localized_namespace() {
        let intro = "---\ntitle: Intro\nmanual: Introduction\nnamespace: en\nslug: intro\nvolume: 1\n---\nWelcome.\n";
        let pads = MemoryPads::new()
            .with_text("fr-ta-modules", FR_INDEX)
            .with_text("ta-intro", intro);
        let corpus = corpus(vec![corpus_page(&[("slug", "intro")], vec![BodyNode::leaf("p", "Salut")])]);
        let mut ctx = RunContext::silent();

        import_corpus(&pads, &StripTags, &corpus, &ImportOptions::new("fr"), &mut ctx).unwrap();

        let html = pads.stored_html("fr-ta-intro").unwrap();
        assert!(html.contains("<br><strong>namespace:</strong> fr<br>"));
    }

    #[test]
    fn test_ensure_pad_id() {
        let pads = MemoryPads::new().with_text("fr-ta-ready", "x");

        assert_eq!(ensure_pad_id(&pads, "fr-ta-intro", "fr", false).unwrap(), "fr-ta-intro");
        assert!(!pads.contains("fr-ta-intro"));

        assert_eq!(ensure_pad_id(&pads, "ta-new", "fr", false).unwrap(), "fr-ta-new");
        assert!(pads.contains("fr-ta-new"));

        assert_eq!(ensure_pad_id(&pads, "ta-ready", "fr", false).unwrap(), "fr-ta-ready");
        assert_eq!(pads.get_text("fr-ta-ready").unwrap(), "x");

        ensure_pad_id(&pads, "ta-ready", "fr", true).unwrap();
        assert_eq!(pads.get_text("fr-ta-ready").unwrap(), "");
    }

    #[test]
    fn test_build_pad_html() {
        let mut header = PageHeader::new();
        header.insert("volume", Value::Number(1.into()));
        header.insert("slug", Value::String("intro".into()));
        header.insert(
            "dependencies",
            Value::Sequence(vec![Value::String("a".into()), Value::String("b".into())]),
        );

        let html = build_pad_html(&header, "Line <1> & café\n  * item");

        assert_eq!(
            html,
            "<!DOCTYPE HTML><html><body>---&nbsp;<br>\
             <strong>dependencies:</strong> [\"a\",\"b\"]<br>\
             <strong>slug:</strong> intro<br>\
             <strong>volume:</strong> 1<br>\
             ---&nbsp;<br><br>\
             Line &lt;1&gt; &amp; caf&#233;<br>  * item<br></body></html>"
        );
    }

    #[test]
    fn test_header_value_text() {
        assert_eq!(header_value_text(&Value::Bool(true)), "true");
        assert_eq!(header_value_text(&Value::Null), "");
        assert_eq!(header_value_text(&serde_yaml::from_str::<Value>("1.5").unwrap()), "1.5");
    }
}
