//! # Margo API Server Library
//!
//! HTTP surface over the planning core in `margo-shared`.
//!
//! ## Modules
//!
//! - `app`: application state, router and bearer authentication
//! - `config`: environment configuration
//! - `error`: error type and HTTP response mapping
//! - `middleware`: response security headers
//! - `routes`: route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
