//! The JSON document corpus exchanged between export and import.
//!
//! A corpus is a timestamped list of manuals, each holding pages. A page is
//! its header fields in key order followed by its structured body.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::body::BodyNode;
use crate::error::{Result, SyncError};
use crate::parser::PageHeader;

/// Format of the corpus timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Key the invalid flag is serialized under.
pub const INVALID_KEY: &str = "invalid";

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub timestamp: String,
    pub manuals: Vec<Manual>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manual {
    pub name: String,
    pub pages: Vec<CorpusPage>,
}

/// One page as stored in the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusPage {
    /// Header fields, sorted by key.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub body: Vec<BodyNode>,
}

impl CorpusPage {
    /// Build a corpus page from a parsed header and extracted body.
    pub fn from_header(header: &PageHeader, body: Vec<BodyNode>) -> Result<Self> {
        let mut fields = BTreeMap::new();
        for (key, value) in header.iter() {
            let json = serde_json::to_value(value).map_err(|e| SyncError::Corpus {
                message: format!("Header field `{}` cannot be stored as JSON: {}", key, e),
                help: None,
            })?;
            fields.insert(key.to_string(), json);
        }
        if header.is_invalid() {
            fields.insert(INVALID_KEY.to_string(), Value::Bool(true));
        }

        Ok(Self { fields, body })
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn slug(&self) -> Option<&str> {
        self.field_str("slug").map(str::trim)
    }

    pub fn title(&self) -> Option<&str> {
        self.field_str("title")
    }

    pub fn question(&self) -> Option<&str> {
        self.field_str("question")
    }

    pub fn is_invalid(&self) -> bool {
        self.fields
            .get(INVALID_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl Corpus {
    /// A corpus stamped with the current time.
    pub fn new(manuals: Vec<Manual>) -> Self {
        Self {
            timestamp: timestamp_now(),
            manuals,
        }
    }

    pub fn page_count(&self) -> usize {
        self.manuals.iter().map(|m| m.pages.len()).sum()
    }

    /// All pages in manual order.
    pub fn pages(&self) -> impl Iterator<Item = &CorpusPage> {
        self.manuals.iter().flat_map(|m| m.pages.iter())
    }

    /// Parse a corpus, tolerating a leading byte-order mark.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.strip_prefix(BOM).unwrap_or(content);
        serde_json::from_str(content).map_err(|e| SyncError::Corpus {
            message: format!("Invalid corpus JSON: {}", e),
            help: Some("The file should be the output of `ta-sync export`".to_string()),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SyncError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read corpus: {}", e),
        })?;

        Self::parse(&content)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| SyncError::Corpus {
            message: format!("Failed to serialize corpus: {}", e),
            help: None,
        })
    }

    /// Write the corpus, creating parent directories as needed.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SyncError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }

        fs::write(path, self.to_json(pretty)?).map_err(|e| SyncError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write corpus: {}", e),
        })
    }
}

/// The current UTC time in corpus timestamp format.
pub fn timestamp_now() -> String {
    jiff::Timestamp::now().strftime(TIMESTAMP_FORMAT).to_string()
}
