//! Catalog records: categories and the services listed under them

use serde::{Deserialize, Serialize};
use std::fmt;

use super::de;

/// Publication status shared by categories and services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Active => write!(f, "active"),
            RecordStatus::Inactive => write!(f, "inactive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default, deserialize_with = "de::nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub slug: String,
    #[serde(default)]
    pub status: RecordStatus,
    /// Presentation only; filled from the static style table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Name/slug pair attached to a services-by-category response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub slug: String,
}

/// Populated category embedded in a service record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "_id", default, deserialize_with = "de::nullable")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A service's owning category: bare id or populated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Populated(CategorySummary),
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) => id,
            CategoryRef::Populated(summary) => &summary.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Id(_) => None,
            CategoryRef::Populated(summary) => summary.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "_id", default, deserialize_with = "de::nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub price: f64,
    /// Free-text unit label ("Per KM", "One Way")
    #[serde(default, deserialize_with = "de::nullable")]
    pub duration: String,
    /// Always normalized on decode, whatever shape the wire used
    #[serde(default, deserialize_with = "de::features")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

impl Service {
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(CategoryRef::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_from_wire() {
        let cat: Category = serde_json::from_value(json!({
            "_id": "64f0",
            "name": "Airport Transfer",
            "description": null,
            "slug": "airport_transfer",
            "status": "inactive",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(cat.id, "64f0");
        assert_eq!(cat.description, "");
        assert_eq!(cat.status, RecordStatus::Inactive);
        assert!(cat.icon.is_none());
    }

    #[test]
    fn test_category_status_defaults_to_active() {
        let cat: Category = serde_json::from_value(json!({ "name": "Outstation" })).unwrap();
        assert_eq!(cat.status, RecordStatus::Active);
    }

    #[test]
    fn test_service_features_normalized_on_decode() {
        let svc: Service = serde_json::from_value(json!({
            "_id": "s1",
            "name": "City Ride",
            "price": "150",
            "features": "[\"AC Vehicle\",\"GPS Tracking\"]"
        }))
        .unwrap();

        assert_eq!(svc.features, vec!["AC Vehicle", "GPS Tracking"]);
        assert!((svc.price - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_service_missing_features_is_empty() {
        let svc: Service = serde_json::from_value(json!({ "name": "Bare" })).unwrap();
        assert!(svc.features.is_empty());
    }

    #[test]
    fn test_category_ref_bare_id() {
        let svc: Service =
            serde_json::from_value(json!({ "name": "X", "category": "cat9" })).unwrap();
        assert_eq!(svc.category_id(), Some("cat9"));
        assert_eq!(svc.category.as_ref().and_then(CategoryRef::name), None);
    }

    #[test]
    fn test_category_ref_populated() {
        let svc: Service = serde_json::from_value(json!({
            "name": "X",
            "category": { "_id": "cat9", "name": "Outstation", "slug": "outstation" }
        }))
        .unwrap();
        assert_eq!(svc.category_id(), Some("cat9"));
        assert_eq!(
            svc.category.as_ref().and_then(CategoryRef::name),
            Some("Outstation")
        );
    }

    #[test]
    fn test_virtual_id_alongside_mongo_id() {
        let svc: Service = serde_json::from_value(json!({
            "_id": "s1",
            "id": "s1",
            "name": "One Way",
            "category": { "_id": "cat3", "id": "cat3", "name": "Outstation" }
        }))
        .unwrap();
        assert_eq!(svc.id, "s1");
        assert_eq!(svc.category_id(), Some("cat3"));

        let cat: Category =
            serde_json::from_value(json!({ "_id": "c1", "id": "c1", "name": "Intracity" })).unwrap();
        assert_eq!(cat.id, "c1");
    }

    #[test]
    fn test_null_name_does_not_poison_list() {
        let services: Vec<Service> = serde_json::from_value(json!([
            { "name": "Live One" },
            { "_id": "s2", "name": null },
            { "_id": null }
        ]))
        .unwrap();
        assert_eq!(services.len(), 3);
        assert_eq!(services[0].name, "Live One");
        assert_eq!(services[1].name, "");
        assert_eq!(services[2].id, "");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RecordStatus::Active.to_string(), "active");
        assert_eq!(RecordStatus::Inactive.to_string(), "inactive");
    }
}
