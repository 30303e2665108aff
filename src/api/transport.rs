//! Blocking reqwest transport

use reqwest::blocking::{multipart, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{ApiRequest, ApiResponse, HttpMethod, MultipartForm, RequestBody, Transport};
use crate::types::{GocabError, Result};

pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GocabError::Network(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for ReqwestTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(form) => builder.multipart(to_reqwest_form(form)?),
        };

        debug!(method = %request.method, %url, "sending request");
        let response = builder
            .send()
            .map_err(|e| GocabError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| GocabError::Network(format!("Failed to read response: {}", e)))?;
        debug!(method = %request.method, %url, status, "received response");

        Ok(ApiResponse {
            status,
            body: parse_body(text),
        })
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn to_reqwest_form(form: &MultipartForm) -> Result<multipart::Form> {
    let mut out = multipart::Form::new();
    for (name, value) in &form.fields {
        out = out.text(name.clone(), value.clone());
    }
    for file in &form.files {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| GocabError::Validation(format!("Invalid content type: {}", e)))?;
        out = out.part(file.field.clone(), part);
    }
    Ok(out)
}
