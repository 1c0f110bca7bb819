//! Last-successful-run checkpoint.
//!
//! The checkpoint file holds the Unix time of the last export that logged no
//! errors, in seconds.

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::debug;

use crate::error::{Result, SyncError};

#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded time, if the file exists and holds a number.
    ///
    /// Fractional seconds are accepted and dropped.
    pub fn read(&self) -> Option<Timestamp> {
        let content = fs::read_to_string(&self.path).ok()?;
        let seconds: f64 = content.trim().parse().ok()?;
        match Timestamp::from_second(seconds.trunc() as i64) {
            Ok(ts) => Some(ts),
            Err(e) => {
                debug!("ignoring checkpoint {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn record(&self, at: Timestamp) -> Result<()> {
        fs::write(&self.path, at.as_second().to_string()).map_err(|e| SyncError::Io {
            path: self.path.clone(),
            message: format!("Failed to write checkpoint: {}", e),
        })
    }

    pub fn record_now(&self) -> Result<()> {
        self.record(Timestamp::now())
    }
}
