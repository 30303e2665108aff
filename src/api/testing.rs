//! In-memory transport with scripted replies

use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::{ApiRequest, ApiResponse, HttpMethod, Transport};
use crate::types::{GocabError, Result};

pub(crate) type RequestLog = Arc<Mutex<Vec<ApiRequest>>>;

#[derive(Clone)]
enum Reply {
    Json(u16, Value),
    NetworkDown,
}

/// Routes match on method + exact path; unmatched requests fail like a
/// dropped connection.
pub(crate) struct ScriptedTransport {
    routes: Vec<(HttpMethod, String, Reply)>,
    log: RequestLog,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every request fails at the network level
    pub fn offline() -> Self {
        Self::new()
    }

    pub fn on(mut self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .push((method, path.to_string(), Reply::Json(status, body)));
        self
    }

    pub fn fail(mut self, method: HttpMethod, path: &str) -> Self {
        self.routes
            .push((method, path.to_string(), Reply::NetworkDown));
        self
    }

    pub fn requests(&self) -> RequestLog {
        Arc::clone(&self.log)
    }
}

impl Transport for ScriptedTransport {
    fn base_url(&self) -> &str {
        "http://scripted.test"
    }

    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.log
            .lock()
            .expect("request log poisoned")
            .push(request.clone());

        let reply = self
            .routes
            .iter()
            .find(|(method, path, _)| *method == request.method && *path == request.path)
            .map(|(_, _, reply)| reply.clone());

        match reply {
            Some(Reply::Json(status, body)) => Ok(ApiResponse { status, body }),
            Some(Reply::NetworkDown) | None => Err(GocabError::Network(format!(
                "HTTP request failed: connection refused ({} {})",
                request.method, request.path
            ))),
        }
    }
}
