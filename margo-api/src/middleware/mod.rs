/// Middleware for the API server
///
/// - `security`: response security headers
///
/// Bearer authentication lives next to the router in [`crate::app`].

pub mod security;
