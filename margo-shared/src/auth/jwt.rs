/// JWT access tokens
///
/// Margo accepts bearer tokens issued by its identity provider: HS256 with a
/// shared secret, audience `"authenticated"`, and the user ID in `sub`.
/// [`create_token`] exists for tests and local tooling that need to mint the
/// same shape of token.
///
/// # Security
///
/// - **Algorithm**: HS256 only; tokens signed with anything else are rejected
/// - **Validation**: signature, expiration and audience
/// - **Secret**: at least 32 bytes, enforced by the API configuration
///
/// # Example
///
/// ```
/// use margo_shared::auth::jwt::{create_token, validate_access_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-hs256-secret-of-at-least-32-bytes";
/// let user_id = Uuid::new_v4();
///
/// let token = create_token(&Claims::new(user_id, "ada@example.com"), secret)?;
/// let claims = validate_access_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience carried by every user access token
pub const AUDIENCE: &str = "authenticated";

/// Default lifetime of tokens minted by [`Claims::new`]
const DEFAULT_LIFETIME_HOURS: i64 = 1;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid audience: expected {AUDIENCE}")]
    InvalidAudience,
}

/// Claims of a user access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,

    /// Always [`AUDIENCE`]
    pub aud: String,

    /// Email address of the user, when the provider includes it
    #[serde(default)]
    pub email: Option<String>,

    /// Provider role, usually "authenticated"
    #[serde(default)]
    pub role: Option<String>,

    pub iat: i64,

    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` valid for one hour
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self::with_expiration(user_id, email, Duration::hours(DEFAULT_LIFETIME_HOURS))
    }

    pub fn with_expiration(user_id: Uuid, email: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            aud: AUDIENCE.to_string(),
            email: Some(email.into()),
            role: Some(AUDIENCE.to_string()),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a bearer token and returns its claims
///
/// # Errors
///
/// - [`JwtError::Expired`] past `exp`
/// - [`JwtError::InvalidAudience`] if `aud` is not [`AUDIENCE`]
/// - [`JwtError::ValidationError`] for a bad signature or malformed token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidAudience,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
