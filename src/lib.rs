//! Go Cab catalog and admin client
//!
//! Public reads ([`services::CatalogService`]) never leave the caller empty
//! handed: a failed fetch is answered with bundled data and flagged as
//! degraded. Admin operations ([`services::AdminService`]) surface every
//! failure instead.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod types;
