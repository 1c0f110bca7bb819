//! Run configuration (ta-sync.yaml) parsing.
//!
//! Every setting has a default, so the file is optional. Command-line flags
//! override what the file says.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::pad::EtherpadClient;
use crate::transcode::{BuiltinMarkdown, Converter, Pandoc, TranscodeOptions};

/// Default configuration file name.
pub const CONFIG_FILENAME: &str = "ta-sync.yaml";

pub const REMOTE_PAD_URL: &str = "https://pad.door43.org/api";
pub const REMOTE_KEY_FILE: &str = "/usr/share/httpd/.ssh/ep_api_key.door43";
pub const LOCAL_PAD_URL: &str = "http://localhost:9001/api";
pub const LOCAL_KEY_FILE: &str = "/usr/share/httpd/.ssh/ep_api_key";

/// Run configuration loaded from ta-sync.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pad service connection.
    pub etherpad: PadConfig,

    /// Pad holding the section index.
    pub index_pad: String,

    /// Corpus file written by export and read by import by default.
    pub output: PathBuf,

    /// Directory run logs are written to.
    pub log_dir: PathBuf,

    /// File recording the last error-free export.
    pub checkpoint: PathBuf,

    /// Only pages of this volume are exported.
    pub volume: i64,

    pub converter: ConverterKind,

    /// Path or name of the pandoc executable.
    pub pandoc: PathBuf,

    /// Prefix for namespaced wiki links.
    pub link_base: String,

    /// Prefix for embedded images.
    pub media_base: String,
}

/// Pad service connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// API base URL. When unset, the remote server is used if its key file
    /// exists and a local server otherwise.
    pub url: Option<String>,

    /// File holding the API key.
    pub api_key_file: Option<PathBuf>,
}

/// Which document converter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    #[default]
    Pandoc,
    /// In-process Markdown rendering; cannot convert HTML to DokuWiki.
    Builtin,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let transcode = TranscodeOptions::default();
        Self {
            etherpad: PadConfig::default(),
            index_pad: "ta-modules".to_string(),
            output: PathBuf::from("ta_vol1_en_markdown.json"),
            log_dir: PathBuf::from("."),
            checkpoint: PathBuf::from(".lastEpToDwRun"),
            volume: 1,
            converter: ConverterKind::default(),
            pandoc: PathBuf::from("pandoc"),
            link_base: transcode.link_base,
            media_base: transcode.media_base,
        }
    }
}

impl SyncConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SyncError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SyncError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Load the file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn transcode_options(&self) -> TranscodeOptions {
        TranscodeOptions {
            link_base: self.link_base.clone(),
            media_base: self.media_base.clone(),
        }
    }

    pub fn build_converter(&self) -> Box<dyn Converter> {
        match self.converter {
            ConverterKind::Pandoc => Box::new(Pandoc::new(self.pandoc.clone())),
            ConverterKind::Builtin => Box::new(BuiltinMarkdown),
        }
    }

    /// Path of a run log inside the log directory.
    pub fn log_path(&self, file_name: &str) -> PathBuf {
        self.log_dir.join(file_name)
    }

    /// Connect to the configured pad service.
    pub fn connect(&self) -> Result<EtherpadClient> {
        let (url, key_file) = self.etherpad.resolve(|p| p.exists());
        EtherpadClient::with_key_file(url, &key_file)
    }
}

impl PadConfig {
    /// Pick the API URL and key file, consulting `exists` for the remote key
    /// file when either is not configured.
    pub fn resolve(&self, exists: impl Fn(&Path) -> bool) -> (String, PathBuf) {
        let remote_key = Path::new(REMOTE_KEY_FILE);
        let remote_available = exists(remote_key);

        let url = self.url.clone().unwrap_or_else(|| {
            if remote_available {
                REMOTE_PAD_URL.to_string()
            } else {
                LOCAL_PAD_URL.to_string()
            }
        });

        let key_file = self.api_key_file.clone().unwrap_or_else(|| {
            if remote_available {
                remote_key.to_path_buf()
            } else {
                PathBuf::from(LOCAL_KEY_FILE)
            }
        });

        (url, key_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::parse("").unwrap();
        assert_eq!(config.index_pad, "ta-modules");
        assert_eq!(config.volume, 1);
        assert_eq!(config.checkpoint, PathBuf::from(".lastEpToDwRun"));
        assert_eq!(config.converter, ConverterKind::Pandoc);
        assert_eq!(config.link_base, "https://door43.org/");
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = "\
etherpad:
  url: http://pads.example.org/api
volume: 2
converter: builtin
log_dir: logs
";
        let config = SyncConfig::parse(yaml).unwrap();

        assert_eq!(config.etherpad.url.as_deref(), Some("http://pads.example.org/api"));
        assert_eq!(config.volume, 2);
        assert_eq!(config.converter, ConverterKind::Builtin);
        assert_eq!(config.log_path("run.txt"), PathBuf::from("logs/run.txt"));
        assert_eq!(config.index_pad, "ta-modules");
    }

    #[test]
    fn test_invalid_config() {
        let err = SyncConfig::parse("volume: [1, 2").unwrap_err();
        assert!(matches!(err, SyncError::Config { .. }));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = SyncConfig::load_or_default(Path::new("/nonexistent/ta-sync.yaml")).unwrap();
        assert_eq!(config.output, PathBuf::from("ta_vol1_en_markdown.json"));
    }

    #[test]
    fn test_resolve_prefers_remote_when_its_key_exists() {
        let (url, key) = PadConfig::default().resolve(|_| true);
        assert_eq!(url, REMOTE_PAD_URL);
        assert_eq!(key, PathBuf::from(REMOTE_KEY_FILE));
    }

    #[test]
    fn test_resolve_falls_back_to_local() {
        let (url, key) = PadConfig::default().resolve(|_| false);
        assert_eq!(url, LOCAL_PAD_URL);
        assert_eq!(key, PathBuf::from(LOCAL_KEY_FILE));
    }

    #[test]
    fn test_resolve_keeps_configured_values() {
        let config = PadConfig {
            url: Some("http://x/api".to_string()),
            api_key_file: Some(PathBuf::from("key.txt")),
        };
        assert_eq!(
            config.resolve(|_| true),
            ("http://x/api".to_string(), PathBuf::from("key.txt"))
        );
    }
}
