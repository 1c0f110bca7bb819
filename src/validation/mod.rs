//! Validation of page headers.
//!
//! Validation is advisory: a header that fails a check is still used, it is
//! only tagged `invalid` and its diagnostics are reported.

mod checks;
mod warning;

pub use checks::{
    CODE_BLANK, CODE_MISSING, CODE_NOT_INTEGER, CODE_NOT_STRING, CODE_SLUG_HYPHEN,
    CODE_UNKNOWN_KEY,
};
pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::parser::PageHeader;

/// Run all header checks.
pub fn validate_header(header: &PageHeader) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_integer(header, "volume"));
    result.merge(checks::check_string(header, "manual"));
    result.merge(checks::check_slug(header));
    result.merge(checks::check_string(header, "title"));
    result.merge(checks::check_unknown_keys(header));

    result
}
