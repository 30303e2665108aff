//! Public catalog data access
//!
//! Reads never fail from the caller's point of view: when the backend is
//! unreachable, answers with an error status, or sends an unusable
//! envelope, the bundled dataset is served as [`Outcome::Degraded`].
//! Contact submission is a write and surfaces failures instead.

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::fallback;
use crate::api::{path_segment, ApiRequest, Transport};
use crate::types::{
    Category, CategoryLabel, CategoryRef, ContactSubmission, Envelope, GocabError, Outcome,
    Result, Service,
};

const CONTACT_FAILURE_MESSAGE: &str =
    "Failed to submit contact form. Please try again or call us directly.";

/// Services listed under one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryServices {
    pub category: CategoryLabel,
    pub services: Vec<Service>,
}

/// Every category plus its services, keyed by category slug
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub services: BTreeMap<String, Vec<Service>>,
}

pub struct CatalogService {
    transport: Box<dyn Transport>,
}

impl CatalogService {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Active categories, decorated for display
    pub fn categories(&self) -> Outcome<Vec<Category>> {
        let request = ApiRequest::get("/api/categories").query("status", "active");
        match self.fetch::<Vec<Category>>(&request).and_then(Envelope::into_data) {
            Ok(mut categories) => {
                categories.iter_mut().for_each(fallback::decorate);
                Outcome::Live(categories)
            }
            Err(e) => degrade("categories", &e, fallback::categories()),
        }
    }

    /// Services for one category slug
    pub fn services_by_category(&self, slug: &str) -> Outcome<CategoryServices> {
        let fetched = path_segment(slug)
            .map(|segment| ApiRequest::get(format!("/api/services/category/{}", segment)))
            .and_then(|request| self.fetch::<Vec<Service>>(&request))
            .and_then(|envelope| {
                let label = envelope.category();
                Ok((label, envelope.into_data()?))
            });

        match fetched {
            Ok((label, services)) => Outcome::Live(CategoryServices {
                category: label.unwrap_or_else(|| fallback::category_label(slug)),
                services: only_in_category(services, slug),
            }),
            Err(e) => degrade(
                "services",
                &e,
                CategoryServices {
                    category: fallback::category_label(slug),
                    services: fallback::services_for(slug),
                },
            ),
        }
    }

    /// Categories, then every category's services concurrently.
    ///
    /// Issues one category fetch followed by one fetch per category. Each
    /// per-category fetch resolves on its own; a failure falls back for that
    /// slug only.
    pub fn load_catalog(&self) -> Outcome<Catalog> {
        let categories = self.categories();
        let categories_degraded = categories.is_degraded();
        let categories = categories.into_data().unwrap_or_else(fallback::categories);

        let results: Vec<(String, Outcome<CategoryServices>)> = categories
            .par_iter()
            .map(|category| {
                (
                    category.slug.clone(),
                    self.services_by_category(&category.slug),
                )
            })
            .collect();

        let mut degraded = usize::from(categories_degraded);
        let mut services = BTreeMap::new();
        for (slug, outcome) in results {
            if outcome.is_degraded() {
                degraded += 1;
            }
            let listed = outcome.into_data().map(|cs| cs.services).unwrap_or_default();
            services.insert(slug, listed);
        }

        let total = categories.len() + 1;
        let catalog = Catalog {
            categories,
            services,
        };
        debug!(fetches = total, degraded, "catalog loaded");

        if degraded == 0 {
            Outcome::Live(catalog)
        } else {
            Outcome::Degraded {
                data: catalog,
                reason: format!("{} of {} fetches served bundled data", degraded, total),
            }
        }
    }

    /// Submit a lead from the contact form
    pub fn submit_contact(&self, submission: &ContactSubmission) -> Outcome<Value> {
        if let Err(e) = submission.validate() {
            return Outcome::failed(e.to_string());
        }

        let submitted = serde_json::to_value(submission)
            .map_err(GocabError::from)
            .and_then(|body| {
                let request = ApiRequest::post("/api/contacts").json(body);
                self.fetch::<Value>(&request)
            });

        match submitted {
            Ok(envelope) if envelope.success => {
                info!(service_type = %submission.service_type, "contact submitted");
                Outcome::Live(envelope.data.unwrap_or(Value::Null))
            }
            Ok(envelope) => Outcome::failed(
                envelope
                    .failure_message()
                    .unwrap_or(CONTACT_FAILURE_MESSAGE)
                    .to_string(),
            ),
            Err(e) => {
                warn!(error = %e, "contact submission failed");
                Outcome::failed_with(CONTACT_FAILURE_MESSAGE, &e)
            }
        }
    }

    /// Backend health check; never fatal
    pub fn health(&self) -> Outcome<Value> {
        let request = ApiRequest::get("/api/health");
        match self.transport.send(&request) {
            Ok(response) if response.is_success() => {
                info!(base_url = self.transport.base_url(), "backend healthy");
                Outcome::Live(response.body)
            }
            Ok(response) => {
                let err = GocabError::Http {
                    status: response.status,
                    url: self.url(&request),
                };
                warn!(error = %err, "backend unhealthy");
                Outcome::failed_with("Backend not reachable", &err)
            }
            Err(e) => {
                warn!(error = %e, "backend not reachable");
                Outcome::failed_with("Backend not reachable", &e)
            }
        }
    }

    fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<Envelope<T>> {
        self.transport
            .send(request)?
            .ok_envelope(&self.url(request))
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.transport.base_url(), request.path)
    }
}

fn degrade<T>(resource: &str, err: &GocabError, data: T) -> Outcome<T> {
    warn!(resource, error = %err, "backend unavailable, serving bundled data");
    Outcome::Degraded {
        data,
        reason: err.to_string(),
    }
}

/// Drop services whose populated category names a different slug.
fn only_in_category(services: Vec<Service>, slug: &str) -> Vec<Service> {
    services
        .into_iter()
        .filter(|service| match &service.category {
            Some(CategoryRef::Populated(summary)) => {
                summary.slug.as_deref().map_or(true, |s| s == slug)
            }
            _ => true,
        })
        .collect()
}
