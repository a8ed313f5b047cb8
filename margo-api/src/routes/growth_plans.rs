/// Growth plan endpoints
///
/// - `POST /v1/growth-plans` - Create a growth plan
/// - `GET /v1/growth-plans` - List the caller's growth plans

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use margo_shared::{
    auth::context::AuthContext,
    models::growth_plan::{CreateGrowthPlan, GrowthPlan},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Create growth plan request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGrowthPlanRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

pub async fn create_growth_plan(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateGrowthPlanRequest>,
) -> ApiResult<(StatusCode, Json<GrowthPlan>)> {
    req.validate()?;

    let plan = state
        .store
        .create_growth_plan(CreateGrowthPlan {
            user_id: auth.user_id,
            name: req.name.trim().to_string(),
            description: req.description,
        })
        .await?;

    info!(growth_plan_id = %plan.id, user_id = %auth.user_id, "Growth plan created");

    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn list_growth_plans(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<GrowthPlan>>> {
    let plans = state.store.list_growth_plans(auth.user_id).await?;

    Ok(Json(plans))
}
