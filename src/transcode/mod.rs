//! Markup transcoding between DokuWiki, Markdown Extra and HTML.
//!
//! ```ignore
//! use ta_sync::transcode::{Pandoc, TranscodeOptions, WikiToHtml};
//!
//! let pandoc = Pandoc::default();
//! let html = WikiToHtml::new(&pandoc, &TranscodeOptions::default()).convert(&body)?;
//! ```

mod converter;
mod html_to_wiki;
pub mod rules;
pub mod wiki_to_html;

pub use converter::{BuiltinMarkdown, ConvertError, Converter, Dialect, Pandoc};
pub use html_to_wiki::html_to_wiki;
pub use rules::{RewriteRule, RulePipeline};
pub use wiki_to_html::{wiki_link_href, TranscodeOptions, WikiToHtml};
