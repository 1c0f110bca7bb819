//! Module index parsing.
//!
//! The index pad lists every tA module, grouped into manuals by level-1
//! DokuWiki headings (`====== Introduction ======`). Each listed module
//! links to its pad; the last path segment of that link is the pad id.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// The heading delimiter that starts each section of the index.
pub const SECTION_DELIMITER: &str = "\n======";

/// A manual and the pads it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Classified display name.
    pub name: String,
    /// Pad ids in first-seen order, without duplicates.
    pub pad_ids: Vec<String>,
}

impl Section {
    /// Create a section, classifying the raw heading text and dropping
    /// duplicate pad ids.
    pub fn new(raw_name: &str, pad_ids: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let pad_ids = pad_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        Self {
            name: classify_section(raw_name),
            pad_ids,
        }
    }
}

/// Map a raw section heading onto the fixed manual taxonomy.
pub fn classify_section(name: &str) -> String {
    let lower = name.to_lowercase();

    let classified = [
        ("intro", "Introduction"),
        ("transla", "Translation"),
        ("check", "Checking"),
        ("tech", "Technology"),
        ("proc", "Process"),
    ]
    .iter()
    .find(|(prefix, _)| lower.starts_with(prefix))
    .map(|(_, manual)| *manual);

    classified.unwrap_or(name).to_string()
}

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[\w./-]+").unwrap());

/// Extract the pad id from the first URL on a line.
pub fn pad_id_from_line(line: &str) -> Option<String> {
    let url = URL_RE.find(line)?.as_str();
    let id = match url.rfind('/') {
        Some(pos) => &url[pos + 1..],
        None => url,
    };

    (!id.is_empty()).then(|| id.to_string())
}

/// Parse the index pad into sections.
///
/// Text before the first section heading is ignored. A heading on the very
/// first line counts as the first delimiter. An index without any section
/// heading has no sections.
pub fn parse_index(raw: &str) -> Vec<Section> {
    let heading = &SECTION_DELIMITER[1..];
    let sections = match raw.strip_prefix(heading) {
        Some(rest) => rest,
        None => match raw.find(SECTION_DELIMITER) {
            Some(start) => &raw[start + SECTION_DELIMITER.len()..],
            None => return Vec::new(),
        },
    };

    sections
        .split(SECTION_DELIMITER)
        .filter_map(parse_section_chunk)
        .collect()
}

fn parse_section_chunk(chunk: &str) -> Option<Section> {
    let mut lines = chunk.lines().filter(|l| !l.trim().is_empty());

    let name = lines.next()?.replace('=', "");
    let name = name.trim();

    Some(Section::new(name, lines.filter_map(pad_id_from_line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INDEX: &str = "\
Intro text that is not part of any section.
====== Introduction ======
  * [[https://pad.door43.org/p/ta-intro|Introduction to tA]]
  * https://pad.door43.org/p/ta-finding_answers and more text https://other.org/x

====== Translation Manual ======
  * https://pad.door43.org/p/ta-translate_why
  * https://pad.door43.org/p/ta-translate_why
  * no link here
====== Appendix ======
";

    #[test]
    fn test_parse_index_sections() {
        let sections = parse_index(INDEX);

        assert_eq!(
            sections,
            vec![
                Section {
                    name: "Introduction".to_string(),
                    pad_ids: vec!["ta-intro".to_string(), "ta-finding_answers".to_string()],
                },
                Section {
                    name: "Translation".to_string(),
                    pad_ids: vec!["ta-translate_why".to_string()],
                },
                Section {
                    name: "Appendix".to_string(),
                    pad_ids: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_urls_yield_one_id() {
        let sections = parse_index(
            "\n====== Checking ======\nhttps://x.org/p/check_a\nsee https://x.org/p/check_a\n",
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].pad_ids, vec!["check_a".to_string()]);
    }

    #[test]
    fn test_index_starting_with_heading() {
        let sections =
            parse_index("====== Introduction ======\n  * https://door43.org/p/intro\n");

        assert_eq!(
            sections,
            vec![Section {
                name: "Introduction".to_string(),
                pad_ids: vec!["intro".to_string()],
            }]
        );
    }

    #[test]
    fn test_index_without_sections() {
        assert!(parse_index("just some text\nhttps://x.org/p/a\n").is_empty());
    }

    #[test]
    fn test_classify_section() {
        assert_eq!(classify_section("INTRODUCTION to tA"), "Introduction");
        assert_eq!(classify_section("translation"), "Translation");
        assert_eq!(classify_section("Checking Manual"), "Checking");
        assert_eq!(classify_section("Technology"), "Technology");
        assert_eq!(classify_section("process"), "Process");
        assert_eq!(classify_section("Gateway Languages"), "Gateway Languages");
    }

    #[test]
    fn test_pad_id_from_line() {
        assert_eq!(
            pad_id_from_line("  * http://door43.org/p/ta-intro"),
            Some("ta-intro".to_string())
        );
        assert_eq!(pad_id_from_line("https://x.org/p/"), None);
        assert_eq!(pad_id_from_line("nothing"), None);
    }
}
