//! Run log written as a DokuWiki page.
//!
//! Each run starts a fresh log file. Section headings render as level-two
//! DokuWiki headings, entries as bullets, and errors in red.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{Result, SyncError};
use crate::output::Printer;

/// Log sink for one run, optionally mirrored to the console.
#[derive(Debug, Default)]
pub struct RunLog {
    file: Option<(PathBuf, File)>,
    printer: Option<Printer>,
}

impl RunLog {
    /// A log that records nothing.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Start a new log file, replacing any log left by an earlier run.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SyncError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create log directory: {}", e),
            })?;
        }

        if path.exists() {
            fs::remove_file(path).map_err(|e| SyncError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to remove old log: {}", e),
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SyncError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to open log: {}", e),
            })?;

        Ok(Self {
            file: Some((path.to_path_buf(), file)),
            printer: None,
        })
    }

    /// Mirror every line to the console.
    pub fn with_printer(mut self, printer: Printer) -> Self {
        self.printer = Some(printer);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(path, _)| path.as_path())
    }

    /// A top-level step of the run.
    pub fn heading(&mut self, verb: &str, message: &str) {
        if let Some(printer) = &self.printer {
            printer.status(verb, message);
        }
        self.append(&format!("\n=== {} ===", join(verb, message)));
    }

    /// A detail under the current heading.
    pub fn entry(&mut self, verb: &str, message: &str) {
        if let Some(printer) = &self.printer {
            printer.info(verb, message);
        }
        self.append(&format!("\n  * {}", join(verb, message)));
    }

    pub fn warning(&mut self, message: &str) {
        if let Some(printer) = &self.printer {
            printer.warning("warning", message);
        }
        self.append(&format!("\n  * {}", message));
    }

    pub fn error(&mut self, message: &str) {
        if let Some(printer) = &self.printer {
            printer.error("error", message);
        }
        self.append(&format!(
            "\n  * <font inherit/inherit;;#bb0000;;inherit>{}</font>",
            message
        ));
    }

    fn append(&mut self, line: &str) {
        if let Some((path, file)) = self.file.as_mut() {
            if let Err(e) = file.write_all(line.as_bytes()) {
                warn!("failed to write run log {}: {}", path.display(), e);
            }
        }
    }
}

fn join(verb: &str, message: &str) -> String {
    if message.is_empty() {
        verb.to_string()
    } else {
        format!("{} {}", verb, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dokuwiki_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("run.txt");

        let mut log = RunLog::create(&path).unwrap();
        log.heading("Retrieving", "introduction:ta-intro");
        log.entry("Updating", "fr-ta-intro");
        log.error("No header data found for ta-x");
        log.warning("Unknown key");
        drop(log);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\n=== Retrieving introduction:ta-intro ===\
             \n  * Updating fr-ta-intro\
             \n  * <font inherit/inherit;;#bb0000;;inherit>No header data found for ta-x</font>\
             \n  * Unknown key"
        );
    }

    #[test]
    fn test_create_replaces_old_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.txt");
        fs::write(&path, "old run").unwrap();

        let mut log = RunLog::create(&path).unwrap();
        log.heading("Finished updating", "");
        drop(log);

        assert_eq!(fs::read_to_string(&path).unwrap(), "\n=== Finished updating ===");
    }

    #[test]
    fn test_silent_log_has_no_path() {
        let mut log = RunLog::silent();
        log.error("ignored");
        assert!(log.path().is_none());
    }
}
