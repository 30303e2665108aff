//! Contact form leads and the admin-side view of them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{de, GocabError};

/// Triage status of a lead
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Unread,
    Read,
    Responded,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContactStatus::Unread => "unread",
            ContactStatus::Read => "read",
            ContactStatus::Responded => "responded",
        };
        f.pad(s)
    }
}

impl FromStr for ContactStatus {
    type Err = GocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unread" => Ok(ContactStatus::Unread),
            "read" => Ok(ContactStatus::Read),
            "responded" => Ok(ContactStatus::Responded),
            other => Err(GocabError::Validation(format!(
                "Unknown contact status '{}' (expected unread, read or responded)",
                other
            ))),
        }
    }
}

/// A lead as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id", default, deserialize_with = "de::nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub service_type: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub pickup_location: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub drop_location: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub travel_date: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub travel_time: String,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub passengers: Option<u32>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Lead-capture form payload (`POST /api/contacts`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service_type: String,
    pub pickup_location: String,
    pub drop_location: String,
    pub travel_date: String,
    pub travel_time: String,
    pub passengers: String,
    pub message: String,
}

impl ContactSubmission {
    /// Name, phone and requested service are mandatory.
    pub fn validate(&self) -> Result<(), GocabError> {
        let missing = [&self.name, &self.phone, &self.service_type]
            .iter()
            .any(|field| field.trim().is_empty());
        if missing {
            return Err(GocabError::Validation(
                "Please fill in all required fields".into(),
            ));
        }
        Ok(())
    }
}

/// Admin contact list query (`GET /api/contacts`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFilters {
    pub status: Option<ContactStatus>,
    pub service_type: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ContactFilters {
    fn default() -> Self {
        Self {
            status: None,
            service_type: None,
            page: 1,
            limit: 20,
        }
    }
}

impl ContactFilters {
    /// Query pairs with empty filters omitted
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.to_string()));
        }
        if let Some(service_type) = self.service_type.as_deref() {
            if !service_type.trim().is_empty() {
                query.push(("serviceType".to_string(), service_type.trim().to_string()));
            }
        }
        query.push(("page".to_string(), self.page.to_string()));
        query.push(("limit".to_string(), self.limit.to_string()));
        query
    }
}
