/// Tactic endpoints
///
/// A tactic names the kind of content a campaign produces ("Webinar",
/// "Case study"); generated task names use it.
///
/// - `POST /v1/tactics` - Create a tactic
/// - `GET /v1/tactics` - List the caller's tactics, by name

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use margo_shared::{
    auth::context::AuthContext,
    models::tactic::{CreateTactic, Tactic},
};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTacticRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,
}

pub async fn create_tactic(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTacticRequest>,
) -> ApiResult<(StatusCode, Json<Tactic>)> {
    req.validate()?;

    let tactic = state
        .store
        .create_tactic(CreateTactic {
            user_id: auth.user_id,
            name: req.name.trim().to_string(),
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(tactic)))
}

pub async fn list_tactics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Tactic>>> {
    Ok(Json(state.store.list_tactics(auth.user_id).await?))
}
