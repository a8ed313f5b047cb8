//! # Margo Shared Library
//!
//! Domain types, storage and planning logic shared by the Margo API server.
//!
//! ## Module Organization
//!
//! - `models`: database records and their queries
//! - `store`: the `DataStore` trait with PostgreSQL and in-memory backends
//! - `planning`: interval partitioning, project generation, cascade deletion
//! - `auth`: bearer-token validation and the per-request auth context
//! - `email`: transactional email delivery and the onboarding flow
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod email;
pub mod models;
pub mod planning;
pub mod store;

/// Current version of the Margo shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
