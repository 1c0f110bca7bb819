//! Front-matter extraction.
//!
//! A tA page starts with a `---` line, carries one `key: value` pair per
//! line, and closes the header with another `---` line:
//!
//! ```text
//! ---
//! title: Test tA Module 1
//! question: What is Module 1 all about?
//! manual: Section_Name
//! volume: 1
//! slug: testmod1
//! dependencies: ["intro", "howdy"]
//! status: finished
//! credits: Used with permission
//! ---
//! page body...
//! ```
//!
//! Every line is parsed as its own YAML document so that one odd value does
//! not change how its neighbours are typed.

use thiserror::Error;

use crate::validation::{validate_header, ValidationResult};

use super::types::PageHeader;

/// A page split into its raw header block and its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParts<'a> {
    /// Lines between the delimiters.
    pub header: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Why a header block could not be turned into a [`PageHeader`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Bad header format => {line}")]
    Malformed { line: String },

    #[error("Not able to parse header value => {line}: {message}")]
    Yaml { line: String, message: String },

    #[error("Header line did not parse to a key/value pair => {line}")]
    UnexpectedType { line: String },

    #[error("No header data found")]
    Empty,
}

/// A successfully parsed header along with its validation report.
#[derive(Debug, Clone)]
pub struct ParsedHeader {
    pub header: PageHeader,
    pub diagnostics: ValidationResult,
}

/// Split a page into header block and body.
///
/// Returns `None` when the page does not open with a `---` line or the
/// header is never closed.
pub fn split_page(source: &str) -> Option<PageParts<'_>> {
    let trimmed = source.trim_start();

    let (first, rest) = split_line(trimmed);
    if first.trim_end() != "---" {
        return None;
    }

    let mut offset = 0;
    let mut remaining = rest;
    while !remaining.is_empty() {
        let (line, after) = split_line(remaining);
        if line.trim_end() == "---" {
            return Some(PageParts {
                header: &rest[..offset],
                body: after,
            });
        }
        offset += remaining.len() - after.len();
        remaining = after;
    }

    None
}

/// Split off the first line, returning it without its line ending and the
/// remainder after the newline.
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => {
            let line = &s[..pos];
            (line.strip_suffix('\r').unwrap_or(line), &s[pos + 1..])
        }
        None => (s, ""),
    }
}

/// Normalize line endings and typographic quotes in a raw header block.
pub fn normalize_header(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Parse a header block without running validation.
pub fn parse_header_values(raw: &str) -> Result<PageHeader, HeaderError> {
    let cleaned = normalize_header(raw);
    let mut header = PageHeader::new();

    for line in cleaned.split('\n').filter(|l| !l.trim().is_empty()) {
        if !line.contains(':') {
            return Err(HeaderError::Malformed {
                line: line.to_string(),
            });
        }

        let parsed: serde_yaml::Value =
            serde_yaml::from_str(line).map_err(|e| HeaderError::Yaml {
                line: line.to_string(),
                message: e.to_string(),
            })?;

        let serde_yaml::Value::Mapping(map) = parsed else {
            return Err(HeaderError::UnexpectedType {
                line: line.to_string(),
            });
        };

        for (key, value) in map {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                other => serde_yaml::to_string(&other)
                    .map(|s| s.trim_end().to_string())
                    .map_err(|_| HeaderError::UnexpectedType {
                        line: line.to_string(),
                    })?,
            };
            header.insert(key, value);
        }
    }

    if header.is_empty() {
        return Err(HeaderError::Empty);
    }

    Ok(header)
}

/// Parse and validate a header block.
///
/// Validation failures do not fail the parse: the header comes back tagged
/// invalid and the diagnostics explain why.
pub fn parse_header(raw: &str) -> Result<ParsedHeader, HeaderError> {
    let mut header = parse_header_values(raw)?;
    let diagnostics = validate_header(&header);

    if diagnostics.has_errors() {
        header.mark_invalid();
    }

    Ok(ParsedHeader {
        header,
        diagnostics,
    })
}
