//! Wire-level request/response types and the transport seam
//!
//! The data-access services build [`ApiRequest`]s and hand them to a
//! [`Transport`]. Production uses [`ReqwestTransport`]; tests script
//! responses in memory.

mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use transport::ReqwestTransport;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::types::{Envelope, GocabError, Result};

/// Trait for sending one request to the backend
pub trait Transport: Send + Sync {
    /// Base URL requests are resolved against (for messages and logs)
    fn base_url(&self) -> &str;

    /// Send a request. Non-2xx statuses are returned, not raised.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Percent-encode one caller-supplied path segment (an id or slug).
///
/// Empty, `.` and `..` are rejected since URL normalization resolves dot
/// segments against the surrounding path even when they are encoded.
pub fn path_segment(raw: &str) -> Result<String> {
    if raw.trim().is_empty() || raw == "." || raw == ".." {
        return Err(GocabError::Validation(format!(
            "Invalid identifier '{}'",
            raw
        )));
    }
    Ok(urlencoding::encode(raw).into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One file attached to a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the base URL, always starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` for an empty body, `String` for non-JSON
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as an envelope regardless of status
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| GocabError::Parse(format!("Invalid response envelope: {}", e)))
    }

    /// Fail on non-2xx, then decode the envelope
    pub fn ok_envelope<T: DeserializeOwned>(&self, url: &str) -> Result<Envelope<T>> {
        if !self.is_success() {
            return Err(GocabError::Http {
                status: self.status,
                url: url.to_string(),
            });
        }
        self.envelope()
    }
}
