/// Authenticated caller
///
/// The API's auth layer validates the bearer token and inserts an
/// [`AuthContext`] into the request extensions. Handlers read it with
/// `Extension<AuthContext>` and scope every query to `user_id`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Authentication context added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (the token's `sub`)
    pub user_id: Uuid,

    /// Email from the token, when present
    pub email: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone().filter(|e| !e.trim().is_empty()),
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
///
/// Returns `None` for other schemes or an empty token.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
