//! DokuWiki to HTML.
//!
//! The DokuWiki body is first massaged into Markdown Extra (headings, image
//! embeds, line breaks, list isolation), converted by the external
//! converter, and then the DokuWiki constructs the converter leaves alone
//! (wiki links, `//emphasis//`, `**strong**`) are patched in the HTML.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::converter::{ConvertError, Converter, Dialect};
use super::rules::{RewriteRule, RulePipeline};

/// Base URL wiki namespace links resolve against.
pub const DEFAULT_LINK_BASE: &str = "https://door43.org/";

/// Base URL for embedded media.
pub const DEFAULT_MEDIA_BASE: &str = "https://door43.org/_media";

// Headings, longest marker first. `.` never crosses a line.
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<p>)?={6}[ \t]*(.*?)[ \t]*={6}(?:</p>)?").unwrap());
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<p>)?={5}[ \t]*(.*?)[ \t]*={5}(?:</p>)?").unwrap());
static H3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<p>)?={4}[ \t]*(.*?)[ \t]*={4}(?:</p>)?").unwrap());
static H4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<p>)?={3}[ \t]*(.*?)[ \t]*={3}(?:</p>)?").unwrap());
static H5_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<p>)?={2}[ \t]*(.*?)[ \t]*={2}(?:</p>)?").unwrap());

// {{:en:ta:diagram.png?nolink&600x174|Caption}}
static PNG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}|]*?)\.png([^{}]*)\}\}").unwrap());

static DOUBLE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\\s*\n\\\\\s*\n").unwrap());
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\\\\s*\n").unwrap());

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[\[(.*?)\]\]").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\*\*(.*?)\*\*").unwrap());

/// URL bases used when rewriting links and media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    pub link_base: String,
    pub media_base: String,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_string(),
            media_base: DEFAULT_MEDIA_BASE.to_string(),
        }
    }
}

/// Heading rules from level 1 (six `=`) down to level 5 (two `=`).
pub fn heading_rules() -> Vec<RewriteRule> {
    vec![
        RewriteRule::template("heading-1", &H1_RE, "# ${1} #"),
        RewriteRule::template("heading-2", &H2_RE, "## ${1} ##"),
        RewriteRule::template("heading-3", &H3_RE, "### ${1} ###"),
        RewriteRule::template("heading-4", &H4_RE, "#### ${1} ####"),
        RewriteRule::template("heading-5", &H5_RE, "##### ${1} #####"),
    ]
}

/// Rewrite `.png` embeds into Markdown images under `media_base`.
pub fn png_rule(media_base: &str) -> RewriteRule {
    let media_base = media_base.trim_end_matches('/').to_string();

    RewriteRule::captures("png-embed", &PNG_RE, move |caps: &Captures<'_>| {
        let path = caps[1].trim().trim_start_matches(':').replace(':', "/");
        let alt = caps[2]
            .split_once('|')
            .map(|(_, caption)| caption.trim())
            .filter(|caption| !caption.is_empty())
            .unwrap_or("Image");

        format!("![{}]({}/{}.png)", alt, media_base, path)
    })
}

/// Line-break conventions: `\\` line endings become paragraph breaks and
/// bullet runs get blank lines around them.
pub fn line_break_rules() -> Vec<RewriteRule> {
    vec![
        RewriteRule::template("double-break", &DOUBLE_BREAK_RE, "\n\n"),
        RewriteRule::template("single-break", &BREAK_RE, "\n\n"),
        RewriteRule::text("bullet-runs", isolate_bullet_runs),
    ]
}

/// Rewrite `[[target|text]]` into anchors.
pub fn link_rule(link_base: &str) -> RewriteRule {
    let link_base = link_base.to_string();

    RewriteRule::captures("wiki-link", &LINK_RE, move |caps: &Captures<'_>| {
        let inner = &caps[1];
        let (target, text) = match inner.split_once('|') {
            Some((target, text)) => (target.trim(), text.trim()),
            None => (inner.trim(), inner.trim()),
        };

        format!(
            "<a href=\"{}\">{}</a>",
            wiki_link_href(target, &link_base).replace('"', "&quot;"),
            text
        )
    })
}

/// Rewrite `//text//` into `<em>`, skipping scheme slashes.
pub fn emphasis_rule() -> RewriteRule {
    RewriteRule::text("emphasis", emphasize_double_slashes)
}

/// Rewrite `**text**` into `<strong>`.
pub fn strong_rule() -> RewriteRule {
    RewriteRule::template("strong", &BOLD_RE, "<strong>${1}</strong>")
}

/// Resolve a wiki link target to an href.
///
/// `http*` targets are kept. Namespace paths (`:en:ta:vol1`) become absolute
/// URLs under `link_base`. Anything else is kept as a relative link.
pub fn wiki_link_href(target: &str, link_base: &str) -> String {
    let is_url = target
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));

    if is_url {
        return target.to_string();
    }

    if target.contains(':') {
        let path = target.strip_prefix(':').unwrap_or(target);
        return format!("{}{}", link_base, path.replace(':', "/"));
    }

    target.to_string()
}

fn is_bullet(line: &str) -> bool {
    let rest = line.trim_start();
    let indent = line.len() - rest.len();
    indent >= 2 && (rest == "*" || rest.starts_with("* "))
}

fn is_indented(line: &str) -> bool {
    line.starts_with("  ") || line.starts_with('\t')
}

/// Put blank lines before and after every run of `  * item` lines so the
/// converter sees a list instead of a paragraph continuation.
pub fn isolate_bullet_runs(input: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_run = false;

    for line in input.split('\n') {
        let blank = line.trim().is_empty();

        if is_bullet(line) {
            if !in_run && out.last().is_some_and(|prev| !prev.trim().is_empty()) {
                out.push("");
            }
            in_run = true;
        } else if in_run && !blank && !is_indented(line) {
            out.push("");
            in_run = false;
        } else if blank {
            in_run = false;
        }

        out.push(line);
    }

    out.join("\n")
}

/// Pair up `//` markers not directly preceded by `:` and wrap the text
/// between each pair in `<em>`.
pub fn emphasize_double_slashes(input: &str) -> String {
    let markers: Vec<usize> = input
        .match_indices("//")
        .map(|(pos, _)| pos)
        .filter(|&pos| !input[..pos].ends_with(':'))
        .collect();

    if markers.len() < 2 {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len() + 9 * markers.len() / 2);
    let mut last = 0;
    for pair in markers.chunks_exact(2) {
        let (open, close) = (pair[0], pair[1]);
        out.push_str(&input[last..open]);
        out.push_str("<em>");
        out.push_str(&input[open + 2..close]);
        out.push_str("</em>");
        last = close + 2;
    }
    out.push_str(&input[last..]);

    out
}

/// DokuWiki to HTML transcoder.
pub struct WikiToHtml<'a> {
    converter: &'a dyn Converter,
    before: RulePipeline,
    after: RulePipeline,
}

impl<'a> WikiToHtml<'a> {
    pub fn new(converter: &'a dyn Converter, options: &TranscodeOptions) -> Self {
        let mut before = RulePipeline::new();
        before
            .extend(heading_rules())
            .push(png_rule(&options.media_base))
            .extend(line_break_rules());

        let mut after = RulePipeline::new();
        after
            .push(link_rule(&options.link_base))
            .push(emphasis_rule())
            .push(strong_rule());

        Self {
            converter,
            before,
            after,
        }
    }

    /// Rewrite DokuWiki into Markdown Extra the converter understands.
    pub fn to_markdown(&self, wiki: &str) -> String {
        self.before.apply(wiki)
    }

    /// Patch DokuWiki constructs left in converter output.
    pub fn patch_html(&self, html: &str) -> String {
        self.after.apply(html)
    }

    /// Full conversion of a page body.
    pub fn convert(&self, wiki: &str) -> Result<String, ConvertError> {
        let markdown = self.to_markdown(wiki);
        let html = self
            .converter
            .convert(Dialect::MarkdownExtra, Dialect::Html, &markdown)?;
        Ok(self.patch_html(&html))
    }

    /// Names of the rules applied before and after conversion.
    pub fn rule_names(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        (self.before.names(), self.after.names())
    }
}
