//! Data access and domain logic

pub mod admin;
pub mod catalog;
pub mod fallback;
pub mod normalizer;
pub mod session;
pub mod slug;

pub use admin::{
    AdminService, CategoryDraft, Credentials, DashboardStats, ImageUpload, ServiceDraft,
};
pub use catalog::{Catalog, CatalogService, CategoryServices};
pub use normalizer::{normalize_features, parse_feature_input};
pub use session::{Session, SessionManager, SessionState, TokenStore};
pub use slug::{generate_slug, humanize_slug};
