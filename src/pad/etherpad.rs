//! Etherpad HTTP API client.

use std::path::Path;

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{PadError, PadService, PAD_NOT_FOUND_MESSAGE};
use crate::error::{Result, SyncError};

/// Etherpad HTTP API version used in request paths.
pub const API_VERSION: &str = "1";

/// Answer code for a request Etherpad rejected as invalid.
const CODE_BAD_PARAMETERS: i64 = 1;
/// Answer code for a rejected API key.
const CODE_NO_AUTH: i64 = 4;

/// The `{code, message, data}` envelope every API answer comes in.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Client for the Etherpad HTTP API.
#[derive(Debug, Clone)]
pub struct EtherpadClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl EtherpadClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client, reading the API key from a file.
    ///
    /// A key that cannot be read is an authentication failure.
    pub fn with_key_file(base_url: impl Into<String>, key_file: &Path) -> Result<Self> {
        let key = std::fs::read_to_string(key_file).map_err(|e| SyncError::Auth {
            message: format!("Failed to read API key from {}: {}", key_file.display(), e),
            help: Some("Set etherpad.api_key_file in ta-sync.yaml".to_string()),
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(SyncError::Auth {
                message: format!("API key file {} is empty", key_file.display()),
                help: None,
            });
        }

        Ok(Self::new(base_url, key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, method)
    }

    /// Call an API method and return its `data` payload.
    ///
    /// Writes go out as form posts so large HTML bodies are not limited by
    /// URL length.
    fn call(
        &self,
        method: &str,
        pad_id: &str,
        extra: &[(&str, &str)],
        post: bool,
    ) -> std::result::Result<Value, PadError> {
        debug!("etherpad {} {}", method, pad_id);

        let mut params: Vec<(&str, &str)> = vec![("apikey", self.api_key.as_str()), ("padID", pad_id)];
        params.extend_from_slice(extra);

        let url = self.endpoint(method);
        let request = if post {
            self.http.post(&url).form(&params)
        } else {
            self.http.get(&url).query(&params)
        };

        let envelope: Envelope = request.send()?.error_for_status()?.json()?;
        interpret(envelope, pad_id)
    }

    fn call_field(&self, method: &str, pad_id: &str, field: &str) -> std::result::Result<String, PadError> {
        let data = self.call(method, pad_id, &[], false)?;
        data.get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PadError::Api {
                code: 0,
                message: format!("{} answer has no `{}` field", method, field),
            })
    }
}

fn interpret(envelope: Envelope, pad_id: &str) -> std::result::Result<Value, PadError> {
    match envelope.code {
        0 => Ok(envelope.data.unwrap_or(Value::Null)),
        CODE_BAD_PARAMETERS if envelope.message == PAD_NOT_FOUND_MESSAGE => {
            Err(PadError::NotFound(pad_id.to_string()))
        }
        CODE_NO_AUTH => Err(PadError::Unauthorized(envelope.message)),
        code => Err(PadError::Api {
            code,
            message: envelope.message,
        }),
    }
}

impl PadService for EtherpadClient {
    fn get_text(&self, pad_id: &str) -> std::result::Result<String, PadError> {
        self.call_field("getText", pad_id, "text")
    }

    fn get_html(&self, pad_id: &str) -> std::result::Result<String, PadError> {
        self.call_field("getHTML", pad_id, "html")
    }

    fn set_html(&self, pad_id: &str, html: &str) -> std::result::Result<(), PadError> {
        self.call("setHTML", pad_id, &[("html", html)], true).map(|_| ())
    }

    fn create_pad(&self, pad_id: &str) -> std::result::Result<(), PadError> {
        self.call("createPad", pad_id, &[], true).map(|_| ())
    }

    fn delete_pad(&self, pad_id: &str) -> std::result::Result<(), PadError> {
        self.call("deletePad", pad_id, &[], true).map(|_| ())
    }
}
