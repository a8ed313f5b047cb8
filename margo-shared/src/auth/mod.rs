/// Authentication utilities
///
/// # Modules
///
/// - [`jwt`]: validation (and minting, for tests) of HS256 bearer tokens
/// - [`context`]: the authenticated caller attached to each request
///
/// # Example
///
/// ```
/// use margo_shared::auth::context::{bearer_token, AuthContext};
/// use margo_shared::auth::jwt::{create_token, validate_access_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-hs256-secret-of-at-least-32-bytes";
/// let token = create_token(&Claims::new(Uuid::new_v4(), "ada@example.com"), secret)?;
/// let header = format!("Bearer {}", token);
///
/// let claims = validate_access_token(bearer_token(&header).unwrap(), secret)?;
/// let auth = AuthContext::from_claims(&claims);
/// assert_eq!(auth.email.as_deref(), Some("ada@example.com"));
/// # Ok(())
/// # }
/// ```

pub mod context;
pub mod jwt;
