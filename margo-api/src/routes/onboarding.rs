/// Onboarding endpoint
///
/// ```text
/// POST /v1/onboarding/welcome
/// { "first_name": "Ada" }
/// ```
///
/// Sends the welcome template to the email in the caller's token and adds
/// the address to the marketing list. Delivery failures are logged and
/// reported in the body; the endpoint answers `202` either way.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use margo_shared::{
    auth::context::AuthContext,
    email::onboarding::{self, WelcomeOutcome, WelcomeSettings},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct WelcomeRequest {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Address the welcome email went to
    pub email: String,

    #[serde(flatten)]
    pub outcome: WelcomeOutcome,
}

pub async fn send_welcome(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<WelcomeRequest>,
) -> ApiResult<(StatusCode, Json<WelcomeResponse>)> {
    req.validate()?;

    let email = auth
        .email
        .clone()
        .ok_or_else(|| ApiError::BadRequest("Token carries no email address".to_string()))?;

    let settings = state
        .config
        .email
        .as_ref()
        .map(|c| c.welcome_settings())
        .unwrap_or_else(|| WelcomeSettings {
            template_id: String::new(),
            list_id: String::new(),
        });

    let outcome = onboarding::send_welcome(
        state.mailer.as_ref(),
        &settings,
        &email,
        req.first_name.as_deref(),
    )
    .await;

    Ok((StatusCode::ACCEPTED, Json(WelcomeResponse { email, outcome })))
}
