//! Typed result of a data-access call
//!
//! Distinguishes real data from substituted fallback data and from hard
//! failures. Serializes to the uniform `{ success, data?, message?, error? }`
//! shape, with `degraded: true` added when fallback data was used.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::GocabError;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Data came from the backend
    Live(T),
    /// Backend call failed; bundled static data substituted
    Degraded { data: T, reason: String },
    /// Hard failure surfaced to the caller
    Failed {
        message: String,
        error: Option<String>,
    },
}

impl<T> Outcome<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        Outcome::Failed {
            message: message.into(),
            error: None,
        }
    }

    pub fn failed_with(message: impl Into<String>, err: &GocabError) -> Self {
        Outcome::Failed {
            message: message.into(),
            error: Some(err.to_string()),
        }
    }

    /// Live and degraded outcomes both carry renderable data.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Live(data) | Outcome::Degraded { data, .. } => Some(data),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Live(data) | Outcome::Degraded { data, .. } => Some(data),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Failed { message, .. } => Some(message),
            Outcome::Degraded { reason, .. } => Some(reason),
            Outcome::Live(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Live(data) => Outcome::Live(f(data)),
            Outcome::Degraded { data, reason } => Outcome::Degraded {
                data: f(data),
                reason,
            },
            Outcome::Failed { message, error } => Outcome::Failed { message, error },
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.is_success())?;
        match self {
            Outcome::Live(data) => {
                map.serialize_entry("data", data)?;
            }
            Outcome::Degraded { data, reason } => {
                map.serialize_entry("data", data)?;
                map.serialize_entry("degraded", &true)?;
                map.serialize_entry("message", reason)?;
            }
            Outcome::Failed { message, error } => {
                map.serialize_entry("message", message)?;
                if let Some(error) = error {
                    map.serialize_entry("error", error)?;
                }
            }
        }
        map.end()
    }
}
