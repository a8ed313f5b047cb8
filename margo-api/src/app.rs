/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use margo_api::{app::{build_router, AppState}, config::Config};
/// use margo_shared::db::pool::{create_pool, DatabaseConfig};
/// use margo_shared::email::LoggingMailer;
/// use margo_shared::store::PgStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::from_url(config.database.url.clone())).await?;
///
/// let state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(LoggingMailer), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::security_headers};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use margo_shared::{
    auth::{
        context::{bearer_token, AuthContext},
        jwt,
    },
    email::EmailSender,
    store::DataStore,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each handler via Axum's `State` extractor; every field is an
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Data store handle
    pub store: Arc<dyn DataStore>,

    /// Outbound email
    pub mailer: Arc<dyn EmailSender>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, mailer: Arc<dyn EmailSender>, config: Config) -> Self {
        Self {
            store,
            mailer,
            config: Arc::new(config),
        }
    }

    /// Secret used to validate bearer tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Store health (public)
/// └── /v1/                                 # Bearer token required
///     ├── /growth-plans          GET POST
///     ├── /tactics               GET POST
///     ├── /campaigns             GET POST
///     │   └── /:id               GET DELETE (?delete_projects=bool)
///     │       ├── /generate      POST
///     │       └── /projects      GET
///     ├── /projects/:id/tasks    GET
///     └── /onboarding/welcome    POST
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, tracing, then bearer
/// authentication on `/v1`.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let v1_routes = Router::new()
        .route(
            "/growth-plans",
            post(routes::growth_plans::create_growth_plan)
                .get(routes::growth_plans::list_growth_plans),
        )
        .route(
            "/tactics",
            post(routes::tactics::create_tactic).get(routes::tactics::list_tactics),
        )
        .route(
            "/campaigns",
            post(routes::campaigns::create_campaign).get(routes::campaigns::list_campaigns),
        )
        .route(
            "/campaigns/:id",
            get(routes::campaigns::get_campaign).delete(routes::campaigns::delete_campaign),
        )
        .route(
            "/campaigns/:id/generate",
            post(routes::campaigns::generate_projects),
        )
        .route(
            "/campaigns/:id/projects",
            get(routes::projects::list_campaign_projects),
        )
        .route("/projects/:id/tasks", get(routes::projects::list_project_tasks))
        .route("/onboarding/welcome", post(routes::onboarding::send_welcome))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            security_headers(production, req, next)
        }))
        .with_state(state)
}

/// Validates the bearer token and injects [`AuthContext`] into the request
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = bearer_token(auth_header)
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
