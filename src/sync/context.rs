//! Per-run state shared by the export and import pipelines.

use std::fmt;

use super::run_log::RunLog;
use crate::output::plural;
use crate::validation::{Severity, ValidationResult};

/// Error tally and log sink for one run.
///
/// Page-level failures are recorded here and the run moves on to the next
/// page. Only fatal problems surface as [`SyncError`](crate::error::SyncError).
#[derive(Debug, Default)]
pub struct RunContext {
    log: RunLog,
    errors: usize,
    warnings: usize,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub errors: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = if self.errors == 1 {
            "1 error has been logged".to_string()
        } else {
            format!("{} errors have been logged", self.errors)
        };
        if self.warnings > 0 {
            write!(f, "{}, {}", errors, plural(self.warnings, "warning", "warnings"))
        } else {
            f.write_str(&errors)
        }
    }
}

impl RunContext {
    pub fn new(log: RunLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// A context that logs nowhere.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn heading(&mut self, verb: &str, message: &str) {
        self.log.heading(verb, message);
    }

    pub fn note(&mut self, verb: &str, message: &str) {
        self.log.entry(verb, message);
    }

    pub fn warn(&mut self, message: impl fmt::Display) {
        self.warnings += 1;
        self.log.warning(&message.to_string());
    }

    /// Record a non-fatal error.
    pub fn error(&mut self, message: impl fmt::Display) {
        self.errors += 1;
        self.log.error(&message.to_string());
    }

    /// Log every diagnostic of a page header, with its help text.
    pub fn record_diagnostics(&mut self, pad_id: &str, result: &ValidationResult) {
        for diagnostic in result.iter() {
            let message = match &diagnostic.help {
                Some(help) => format!("{}: {} ({})", pad_id, diagnostic.message, help),
                None => format!("{}: {}", pad_id, diagnostic.message),
            };
            match diagnostic.severity {
                Severity::Error => self.error(message),
                Severity::Warning => self.warn(message),
            }
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    /// Log the closing lines of a run and return its tally.
    ///
    /// The error count is only logged when something went wrong.
    pub fn finish(&mut self, closing: &str) -> RunSummary {
        let summary = self.summary();
        if !summary.is_clean() {
            self.log.heading(&summary.to_string(), "");
        }
        self.log.heading(closing, "");
        summary
    }
}
