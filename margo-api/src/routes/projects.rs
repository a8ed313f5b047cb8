/// Project and task endpoints
///
/// - `GET /v1/campaigns/:id/projects` - Projects generated for a campaign
/// - `GET /v1/projects/:id/tasks` - Tasks of a project

use crate::{app::AppState, error::ApiResult, routes::campaigns::find_owned_campaign};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use margo_shared::{
    auth::context::AuthContext,
    models::{project::Project, task::Task},
};
use uuid::Uuid;

/// Lists a campaign's projects ordered by period
pub async fn list_campaign_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Project>>> {
    find_owned_campaign(&state, &auth, id).await?;

    Ok(Json(state.store.list_projects_by_campaign(id).await?))
}

/// Lists tasks of a project created by the caller
///
/// Tasks of other users are filtered out, so an unknown or foreign project
/// yields an empty list.
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .store
        .list_tasks_by_project(id)
        .await?
        .into_iter()
        .filter(|task| task.created_by == auth.user_id)
        .collect();

    Ok(Json(tasks))
}
