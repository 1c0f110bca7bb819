//! Field checks for page headers.
//!
//! Each check takes a `&PageHeader` and returns a `ValidationResult`.

use serde_yaml::Value;

use crate::parser::types::{as_integer, is_blank, KNOWN_KEYS};
use crate::parser::PageHeader;

use super::warning::{Diagnostic, ValidationResult};

pub const CODE_MISSING: &str = "ta::header::missing";
pub const CODE_BLANK: &str = "ta::header::blank";
pub const CODE_NOT_STRING: &str = "ta::header::not-string";
pub const CODE_NOT_INTEGER: &str = "ta::header::not-integer";
pub const CODE_SLUG_HYPHEN: &str = "ta::header::slug-hyphen";
pub const CODE_UNKNOWN_KEY: &str = "ta::header::unknown-key";

/// Look up a required key, reporting it missing or blank.
fn required<'a>(header: &'a PageHeader, key: &str, result: &mut ValidationResult) -> Option<&'a Value> {
    let Some(value) = header.get(key) else {
        result.push(
            Diagnostic::error(CODE_MISSING, format!("\"{}\" data value for page is missing", key))
                .with_help(format!("Add `{}:` to the page header", key)),
        );
        return None;
    };

    if is_blank(value) {
        result.error(CODE_BLANK, format!("\"{}\" data value for page is blank", key));
        return None;
    }

    Some(value)
}

/// Check that a key holds an integer, or something that coerces to one.
pub fn check_integer(header: &PageHeader, key: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(value) = required(header, key, &mut result) {
        if as_integer(value).is_none() {
            result.push(
                Diagnostic::error(
                    CODE_NOT_INTEGER,
                    format!("\"{}\" data value for page is not a number", key),
                )
                .with_help(format!("Use a whole number, e.g. `{}: 1`", key)),
            );
        }
    }

    result
}

/// Check that a key holds a non-blank string.
pub fn check_string(header: &PageHeader, key: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(value) = required(header, key, &mut result) {
        match value.as_str() {
            None => result.error(
                CODE_NOT_STRING,
                format!("\"{}\" data value for page is not a string", key),
            ),
            Some(s) if s.trim().is_empty() => {
                result.error(CODE_BLANK, format!("\"{}\" data value for page is blank", key))
            }
            Some(_) => {}
        }
    }

    result
}

/// Check the slug: a non-blank string using underscores, never hyphens.
pub fn check_slug(header: &PageHeader) -> ValidationResult {
    let mut result = check_string(header, "slug");

    if result.has_errors() {
        return result;
    }

    if let Some(slug) = header.slug() {
        if slug.contains('-') {
            result.push(
                Diagnostic::error(
                    CODE_SLUG_HYPHEN,
                    format!("Slug '{}' cannot contain a hyphen (dash)", slug),
                )
                .with_help(format!("Use underscores instead: {}", slug.replace('-', "_"))),
            );
        }
    }

    result
}

/// Warn about keys outside the recognized set. Warnings never invalidate
/// a header.
pub fn check_unknown_keys(header: &PageHeader) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (key, _) in header.iter() {
        if !KNOWN_KEYS.contains(&key) {
            result.warning(CODE_UNKNOWN_KEY, format!("Unrecognized header key '{}'", key));
        }
    }

    result
}
