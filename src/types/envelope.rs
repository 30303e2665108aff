use serde::Deserialize;
use serde_json::Value;

use super::{CategoryLabel, GocabError, Result};

/// Backend response envelope: `{ success, data, message?, token?, category? }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
    /// Only present on login
    pub token: Option<String>,
    /// Only present on services-by-category
    category: Option<Value>,
}

impl<T> Envelope<T> {
    /// Category label, if the backend sent a usable one
    pub fn category(&self) -> Option<CategoryLabel> {
        self.category
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Best human-readable reason for an unsuccessful envelope
    pub fn failure_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }

    /// Unwrap a successful envelope's payload.
    ///
    /// `success: false` and a missing `data` both count as failures.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            let message = self
                .failure_message()
                .unwrap_or("backend reported failure")
                .to_string();
            return Err(GocabError::Parse(message));
        }
        self.data
            .ok_or_else(|| GocabError::Parse("response envelope has no data".into()))
    }
}
