/// Configuration management for the API server
///
/// Loaded from environment variables (and a `.env` file in development)
/// into a typed [`Config`].
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `API_PRODUCTION`: enables HSTS and strict CORS (default: false)
/// - `CORS_ORIGINS`: comma-separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: HS256 secret shared with the identity provider (required, ≥32 chars)
/// - `SENDGRID_API_KEY`: enables email delivery when set
/// - `SENDGRID_FROM_EMAIL`, `SENDGRID_WELCOME_TEMPLATE_ID`, `SENDGRID_LIST_ID`:
///   required when `SENDGRID_API_KEY` is set
///
/// # Example
///
/// ```no_run
/// use margo_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use margo_shared::email::onboarding::WelcomeSettings;
use serde::{Deserialize, Serialize};
use std::env;

/// Minimum JWT secret length
const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    /// `None` when email delivery is disabled
    pub email: Option<EmailConfig>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Production mode turns on HSTS
    pub production: bool,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret the identity provider signs access tokens with
    pub secret: String,
}

/// SendGrid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,

    pub from_email: String,

    pub welcome_template_id: String,

    /// Marketing list new users are added to
    pub list_id: String,
}

impl EmailConfig {
    pub fn welcome_settings(&self) -> WelcomeSettings {
        WelcomeSettings {
            template_id: self.welcome_template_id.clone(),
            list_id: self.list_id.clone(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let port = var("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;
        let production = var("API_PRODUCTION", "false")
            .parse::<bool>()
            .map_err(|e| anyhow::anyhow!("API_PRODUCTION is invalid: {}", e))?;
        let cors_origins = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }

        let email = match lookup("SENDGRID_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(api_key) => Some(EmailConfig {
                api_key,
                from_email: required("SENDGRID_FROM_EMAIL")?,
                welcome_template_id: required("SENDGRID_WELCOME_TEMPLATE_ID")?,
                list_id: required("SENDGRID_LIST_ID")?,
            }),
            None => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: var("API_HOST", "0.0.0.0"),
                port,
                production,
                cors_origins,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            email,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
