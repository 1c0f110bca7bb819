//! ta-sync - translationAcademy sync between Etherpad and JSON
//!
//! Exports DokuWiki pages kept in Etherpad pads into a JSON corpus of
//! structured HTML bodies, and imports translated corpora back into a
//! language's pads.

pub mod body;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pad;
pub mod parser;
pub mod sync;
pub mod transcode;
pub mod validation;

pub use body::{extract_body, render_body, BodyNode, LanguageRewrite};
pub use config::SyncConfig;
pub use corpus::{Corpus, CorpusPage, Manual};
pub use error::{Result, SyncError};
pub use pad::{EtherpadClient, MemoryPads, PadError, PadService};
pub use parser::{parse_header, parse_index, split_page, PageHeader, Section};
pub use sync::{export_corpus, import_corpus, ExportOptions, ImportOptions, RunContext};
pub use transcode::{BuiltinMarkdown, Converter, Pandoc, TranscodeOptions, WikiToHtml};
pub use validation::{validate_header, Diagnostic, Severity, ValidationResult};
