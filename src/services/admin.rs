//! Admin data access
//!
//! Every call is authenticated with an explicit [`Session`]. Failures are
//! never masked with bundled data: they surface as [`Outcome::Failed`]
//! carrying the backend's message when it sent one.

use rayon::join;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::normalizer::parse_feature_input;
use super::session::Session;
use super::slug::generate_slug;
use crate::api::{path_segment, ApiRequest, FilePart, MultipartForm, Transport};
use crate::types::{
    Category, Contact, ContactFilters, ContactStatus, GocabError, Outcome, RecordStatus, Result,
    Service,
};

/// Largest accepted service image
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const OPERATION_FAILED: &str = "Operation failed";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub categories: usize,
    pub services: usize,
    pub contacts: usize,
    pub pending_contacts: usize,
}

/// Category editor input
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
    pub status: RecordStatus,
}

impl CategoryDraft {
    pub fn slug(&self) -> String {
        generate_slug(&self.name)
    }

    /// Required fields, plus uniqueness of slug and name when creating
    pub fn validate(&self, existing: Option<&[Category]>) -> Result<()> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(GocabError::Validation(
                "Please fill in all required fields".into(),
            ));
        }
        let slug = self.slug();
        if slug.is_empty() {
            return Err(GocabError::Validation(
                "Category name must contain at least one letter or digit (a-z, 0-9)".into(),
            ));
        }
        if let Some(existing) = existing {
            let name = self.name.trim();
            let clash = existing
                .iter()
                .any(|cat| cat.slug == slug || cat.name.trim().eq_ignore_ascii_case(name));
            if clash {
                return Err(GocabError::Validation(
                    "A category with this name already exists".into(),
                ));
            }
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "description": self.description.trim(),
            "status": self.status,
            "slug": self.slug(),
        })
    }
}

/// Image attached to a service write
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Load an image file, enforcing type (by extension) and size limits.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(image_content_type)
            .ok_or_else(|| GocabError::Validation("Please upload an image file".into()))?;

        let size = fs::metadata(path)?.len();
        if size > MAX_IMAGE_BYTES {
            return Err(GocabError::Validation(
                "File size must be less than 5MB".into(),
            ));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes: fs::read(path)?,
        })
    }
}

fn image_content_type(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Service editor input
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    /// Owning category id
    pub category: String,
    pub price: f64,
    pub duration: String,
    pub features: Vec<String>,
    pub status: RecordStatus,
    pub image: Option<ImageUpload>,
}

impl ServiceDraft {
    /// Features typed as comma-separated text
    pub fn with_feature_text(mut self, text: &str) -> Self {
        self.features = parse_feature_input(text);
        self
    }

    /// Required fields, a known category, and (on create) a unique name
    /// within that category.
    pub fn validate(&self, categories: &[Category], existing: Option<&[Service]>) -> Result<()> {
        if self.name.trim().is_empty()
            || self.description.trim().is_empty()
            || self.category.trim().is_empty()
        {
            return Err(GocabError::Validation(
                "Please fill in all required fields".into(),
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(GocabError::Validation("Please enter a valid price".into()));
        }
        if !categories.iter().any(|cat| cat.id == self.category) {
            return Err(GocabError::Validation(
                "Please select a valid category. Create categories first if none exist.".into(),
            ));
        }
        if let Some(existing) = existing {
            let name = self.name.trim();
            let duplicate = existing.iter().any(|svc| {
                svc.name.trim().eq_ignore_ascii_case(name)
                    && svc.category_id() == Some(self.category.as_str())
            });
            if duplicate {
                return Err(GocabError::Validation(
                    "A service with this name already exists in this category".into(),
                ));
            }
        }
        Ok(())
    }

    /// JSON without an image, multipart with one
    fn to_request(&self, request: ApiRequest) -> ApiRequest {
        match &self.image {
            None => request.json(json!({
                "name": self.name.trim(),
                "description": self.description.trim(),
                "category": self.category,
                "price": self.price,
                "duration": self.duration.trim(),
                "features": self.features,
                "status": self.status,
            })),
            Some(image) => {
                let mut form = MultipartForm::default()
                    .text("name", self.name.trim())
                    .text("description", self.description.trim())
                    .text("category", self.category.clone())
                    .text("price", self.price.to_string())
                    .text("duration", self.duration.trim())
                    .text("status", self.status.to_string())
                    .file(FilePart {
                        field: "image".to_string(),
                        file_name: image.file_name.clone(),
                        content_type: image.content_type.clone(),
                        bytes: image.bytes.clone(),
                    });
                if !self.features.is_empty() {
                    form = form.text("features", Value::from(self.features.clone()).to_string());
                }
                request.multipart(form)
            }
        }
    }
}

pub struct AdminService {
    transport: Box<dyn Transport>,
}

impl AdminService {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    // ========== Authentication ==========

    /// Exchange credentials for a bearer token. Persistence is the
    /// session manager's job.
    pub fn login(&self, credentials: &Credentials) -> Outcome<String> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Outcome::failed("Please fill in all fields");
        }
        let request = ApiRequest::post("/api/admin/login").json(json!({
            "email": credentials.email.trim(),
            "password": credentials.password,
        }));

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(e) => return Outcome::failed_with(e.to_string(), &e),
        };
        match response.envelope::<Value>() {
            Ok(envelope) if envelope.success => match envelope.token {
                Some(token) if !token.trim().is_empty() => Outcome::Live(token),
                _ => Outcome::failed("Login succeeded but no token was issued"),
            },
            Ok(envelope) => {
                Outcome::failed(envelope.failure_message().unwrap_or("Login failed"))
            }
            Err(e) => Outcome::failed_with("Login failed", &e),
        }
    }

    pub fn logout(&self, session: &Session) -> Outcome<Value> {
        let request = ApiRequest::post("/api/admin/logout")
            .bearer(session.token())
            .json(json!({}));
        self.call("logout", request)
    }

    // ========== Dashboard ==========

    /// Category, service and contact counts fetched concurrently.
    ///
    /// A fetch that fails counts as zero; only when all three fail is the
    /// dashboard itself reported as failed.
    pub fn dashboard(&self, session: &Session) -> Outcome<DashboardStats> {
        let all_contacts = || {
            let request = self.authed(ApiRequest::get("/api/contacts"), session);
            self.call::<Vec<Contact>>("list contacts", request)
        };
        let (categories, (services, contacts)) = join(
            || self.list_categories(session),
            || join(|| self.list_services(session), all_contacts),
        );

        if !categories.is_success() && !services.is_success() && !contacts.is_success() {
            let message = categories.message().unwrap_or(OPERATION_FAILED).to_string();
            return Outcome::failed(message);
        }

        let contact_list = contacts.data().map(Vec::as_slice).unwrap_or_default();
        Outcome::Live(DashboardStats {
            categories: categories.data().map_or(0, Vec::len),
            services: services.data().map_or(0, Vec::len),
            contacts: contact_list.len(),
            pending_contacts: contact_list
                .iter()
                .filter(|c| c.status == ContactStatus::Unread)
                .count(),
        })
    }

    // ========== Categories ==========

    pub fn list_categories(&self, session: &Session) -> Outcome<Vec<Category>> {
        self.call(
            "list categories",
            self.authed(ApiRequest::get("/api/categories"), session),
        )
    }

    /// `existing` is the currently loaded list, used for the duplicate check.
    pub fn create_category(
        &self,
        session: &Session,
        draft: &CategoryDraft,
        existing: &[Category],
    ) -> Outcome<Value> {
        if let Err(e) = draft.validate(Some(existing)) {
            return Outcome::failed(e.to_string());
        }
        let request = ApiRequest::post("/api/categories").json(draft.to_json());
        self.call("create category", self.authed(request, session))
    }

    pub fn update_category(
        &self,
        session: &Session,
        id: &str,
        draft: &CategoryDraft,
    ) -> Outcome<Value> {
        if let Err(e) = draft.validate(None) {
            return Outcome::failed(e.to_string());
        }
        self.call_on("update category", session, id, |id| {
            ApiRequest::put(format!("/api/categories/{}", id)).json(draft.to_json())
        })
    }

    pub fn delete_category(&self, session: &Session, id: &str) -> Outcome<Value> {
        self.call_on("delete category", session, id, |id| {
            ApiRequest::delete(format!("/api/categories/{}", id))
        })
    }

    // ========== Services ==========

    pub fn list_services(&self, session: &Session) -> Outcome<Vec<Service>> {
        self.call(
            "list services",
            self.authed(ApiRequest::get("/api/services"), session),
        )
    }

    pub fn services_by_category(
        &self,
        session: &Session,
        category_id: &str,
    ) -> Outcome<Vec<Service>> {
        self.call_on("services by category", session, category_id, |id| {
            ApiRequest::get(format!("/api/services/by-category/{}", id))
        })
    }

    /// Services and categories together, as the service editor needs both
    pub fn load_service_editor(
        &self,
        session: &Session,
    ) -> (Outcome<Vec<Service>>, Outcome<Vec<Category>>) {
        join(
            || self.list_services(session),
            || self.list_categories(session),
        )
    }

    pub fn create_service(
        &self,
        session: &Session,
        draft: &ServiceDraft,
        categories: &[Category],
        existing: &[Service],
    ) -> Outcome<Value> {
        if let Err(e) = draft.validate(categories, Some(existing)) {
            return Outcome::failed(e.to_string());
        }
        let request = draft.to_request(ApiRequest::post("/api/services"));
        self.call("create service", self.authed(request, session))
    }

    pub fn update_service(
        &self,
        session: &Session,
        id: &str,
        draft: &ServiceDraft,
        categories: &[Category],
    ) -> Outcome<Value> {
        if let Err(e) = draft.validate(categories, None) {
            return Outcome::failed(e.to_string());
        }
        self.call_on("update service", session, id, |id| {
            draft.to_request(ApiRequest::put(format!("/api/services/{}", id)))
        })
    }

    pub fn delete_service(&self, session: &Session, id: &str) -> Outcome<Value> {
        self.call_on("delete service", session, id, |id| {
            ApiRequest::delete(format!("/api/services/{}", id))
        })
    }

    // ========== Contacts ==========

    pub fn list_contacts(
        &self,
        session: &Session,
        filters: &ContactFilters,
    ) -> Outcome<Vec<Contact>> {
        let request = ApiRequest::get("/api/contacts").with_query(filters.to_query());
        self.call("list contacts", self.authed(request, session))
    }

    pub fn update_contact_status(
        &self,
        session: &Session,
        id: &str,
        status: ContactStatus,
    ) -> Outcome<Value> {
        self.call_on("update contact status", session, id, |id| {
            ApiRequest::put(format!("/api/contacts/{}/status", id))
                .json(json!({ "status": status }))
        })
    }

    pub fn delete_contact(&self, session: &Session, id: &str) -> Outcome<Value> {
        self.call_on("delete contact", session, id, |id| {
            ApiRequest::delete(format!("/api/contacts/{}", id))
        })
    }

    fn authed(&self, request: ApiRequest, session: &Session) -> ApiRequest {
        request.bearer(session.token())
    }

    /// `call` for a request addressed to one record; `build` receives the
    /// percent-encoded id.
    fn call_on<T: DeserializeOwned + Default>(
        &self,
        action: &str,
        session: &Session,
        id: &str,
        build: impl FnOnce(&str) -> ApiRequest,
    ) -> Outcome<T> {
        match path_segment(id) {
            Ok(segment) => self.call(action, self.authed(build(&segment), session)),
            Err(e) => Outcome::failed(e.to_string()),
        }
    }

    /// Send and unwrap the envelope. The backend reports most failures in
    /// the body, so the body is read whatever the status.
    fn call<T: DeserializeOwned + Default>(&self, action: &str, request: ApiRequest) -> Outcome<T> {
        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(e) => {
                warn!(action, error = %e, "admin request failed");
                return Outcome::failed_with(e.to_string(), &e);
            }
        };

        match response.envelope::<T>() {
            Ok(envelope) if envelope.success => {
                debug!(action, status = response.status, "admin request ok");
                Outcome::Live(envelope.data.unwrap_or_default())
            }
            Ok(envelope) => {
                let message = envelope.failure_message().unwrap_or(OPERATION_FAILED);
                warn!(action, status = response.status, %message, "admin request rejected");
                Outcome::failed(message)
            }
            Err(parse_err) => {
                let err = if response.is_success() {
                    parse_err
                } else {
                    GocabError::Http {
                        status: response.status,
                        url: format!("{}{}", self.transport.base_url(), request.path),
                    }
                };
                warn!(action, error = %err, "admin response unusable");
                Outcome::failed_with(err.to_string(), &err)
            }
        }
    }
}
