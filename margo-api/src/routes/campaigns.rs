/// Campaign endpoints
///
/// All endpoints are scoped to the authenticated user: another user's
/// campaign answers `404` exactly like a missing one.
///
/// # Endpoints
///
/// - `POST /v1/campaigns` - Create campaign
/// - `GET /v1/campaigns` - List campaigns
/// - `GET /v1/campaigns/:id` - Get campaign with its tactic name
/// - `POST /v1/campaigns/:id/generate` - Generate projects and tasks
/// - `DELETE /v1/campaigns/:id?delete_projects=bool` - Delete campaign

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use margo_shared::{
    auth::context::AuthContext,
    models::{
        campaign::{Campaign, CampaignWithTactic, CreateCampaign, Frequency},
        project::Project,
    },
    planning::{self, CascadePolicy, GenerateProjects},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create campaign request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub growth_plan_id: Option<Uuid>,

    pub tactic_id: Option<Uuid>,

    /// Defaults to monthly
    pub frequency: Option<Frequency>,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 distribution channels"))]
    pub distribution_channels: Vec<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

/// Generate projects request
///
/// Omitted fields fall back to the values stored on the campaign, so `{}`
/// is a valid body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateProjectsRequest {
    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub frequency: Option<Frequency>,

    #[validate(length(max = 20, message = "At most 20 distribution channels"))]
    pub distribution_channels: Option<Vec<String>>,
}

/// Query of `DELETE /v1/campaigns/:id`
#[derive(Debug, Default, Deserialize)]
pub struct DeleteCampaignQuery {
    /// Delete generated projects instead of detaching them
    #[serde(default)]
    pub delete_projects: bool,
}

/// Reads a campaign and checks the caller owns it
pub(crate) async fn find_owned_campaign(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
) -> ApiResult<CampaignWithTactic> {
    state
        .store
        .find_campaign(id)
        .await?
        .filter(|found| found.campaign.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound(format!("Campaign {} not found", id)))
}

/// Checks that referenced tactic and growth plan belong to the caller
async fn check_references(
    state: &AppState,
    auth: &AuthContext,
    req: &CreateCampaignRequest,
) -> ApiResult<()> {
    if let Some(tactic_id) = req.tactic_id {
        if state.store.find_tactic(tactic_id, auth.user_id).await?.is_none() {
            return Err(ApiError::invalid(
                "tactic_id",
                format!("Tactic {} not found", tactic_id),
            ));
        }
    }

    if let Some(growth_plan_id) = req.growth_plan_id {
        if state
            .store
            .find_growth_plan(growth_plan_id, auth.user_id)
            .await?
            .is_none()
        {
            return Err(ApiError::invalid(
                "growth_plan_id",
                format!("Growth plan {} not found", growth_plan_id),
            ));
        }
    }

    Ok(())
}

/// Create campaign
///
/// ```text
/// POST /v1/campaigns
/// {
///   "name": "Spring Launch",
///   "frequency": "weekly",
///   "distribution_channels": ["Email", "LinkedIn"],
///   "start_date": "2024-03-01",
///   "end_date": "2024-05-31"
/// }
/// ```
///
/// # Errors
///
/// - `422`: validation failed, `end_date` precedes `start_date`, or the
///   tactic or growth plan is not one of the caller's
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    req.validate()?;

    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        if end < start {
            return Err(ApiError::invalid("end_date", "end_date must not precede start_date"));
        }
    }

    check_references(&state, &auth, &req).await?;

    let campaign = state
        .store
        .create_campaign(CreateCampaign {
            user_id: auth.user_id,
            growth_plan_id: req.growth_plan_id,
            tactic_id: req.tactic_id,
            name: req.name.trim().to_string(),
            description: req.description,
            frequency: req.frequency.unwrap_or(Frequency::Monthly),
            distribution_channels: req
                .distribution_channels
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            start_date: req.start_date,
            end_date: req.end_date,
        })
        .await?;

    info!(campaign_id = %campaign.id, user_id = %auth.user_id, "Campaign created");

    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Campaign>>> {
    Ok(Json(state.store.list_campaigns(auth.user_id).await?))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CampaignWithTactic>> {
    Ok(Json(find_owned_campaign(&state, &auth, id).await?))
}

/// Generate projects and tasks for a campaign
///
/// ```text
/// POST /v1/campaigns/:id/generate
/// {
///   "start_date": "2024-01-01",
///   "end_date": "2024-01-31",
///   "frequency": "weekly",
///   "distribution_channels": ["Email", "Social"]
/// }
/// ```
///
/// Responds `201` with the created projects. Calling it again creates a
/// second, independent set.
///
/// # Errors
///
/// - `404`: campaign not found
/// - `422`: missing dates, `end_date` before `start_date`, more than 20
///   channels or more than 366 periods
/// - `500`: "Failed to generate projects"; projects written before a task
///   insert failure are kept
pub async fn generate_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<GenerateProjectsRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Project>>)> {
    req.validate()?;

    let found = find_owned_campaign(&state, &auth, id).await?;
    let campaign = found.campaign;

    let start_date = req
        .start_date
        .or(campaign.start_date)
        .ok_or_else(|| ApiError::invalid("start_date", "start_date is required"))?;
    let end_date = req
        .end_date
        .or(campaign.end_date)
        .ok_or_else(|| ApiError::invalid("end_date", "end_date is required"))?;

    let request = GenerateProjects {
        campaign_id: campaign.id,
        start_date,
        end_date,
        frequency: req.frequency.unwrap_or(campaign.frequency),
        distribution_channels: req
            .distribution_channels
            .unwrap_or(campaign.distribution_channels),
        user_id: auth.user_id,
    };

    let projects = planning::generate_projects_for_campaign(state.store.as_ref(), request)
        .await
        .map_err(|e| ApiError::from_planning(e, "Failed to generate projects"))?;

    Ok((StatusCode::CREATED, Json(projects)))
}

/// Delete a campaign
///
/// ```text
/// DELETE /v1/campaigns/:id?delete_projects=true
/// ```
///
/// With `delete_projects=true` the campaign's projects and their tasks are
/// deleted; otherwise they are kept and unlinked. Responds `204`.
///
/// # Errors
///
/// - `404`: campaign not found
/// - `500`: "Failed to delete campaign"
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteCampaignQuery>,
) -> ApiResult<StatusCode> {
    find_owned_campaign(&state, &auth, id).await?;

    let policy = CascadePolicy::from_delete_projects(query.delete_projects);
    planning::delete_campaign(state.store.as_ref(), id, policy)
        .await
        .map_err(|e| ApiError::from_planning(e, "Failed to delete campaign"))?;

    Ok(StatusCode::NO_CONTENT)
}
