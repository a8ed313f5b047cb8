/// Campaign deletion with a policy for its projects
///
/// Projects generated from a campaign can either be deleted with it (tasks
/// first, then projects) or kept and detached (`campaign_id = NULL`). The
/// campaign row is deleted last in both cases.
///
/// Every step is its own store call with no surrounding transaction. A
/// failure stops the sequence: whatever ran before it stays applied and the
/// campaign row is left in place.

use tracing::{debug, error, info};
use uuid::Uuid;

use super::error::PlanningError;
use crate::store::DataStore;

/// What happens to a campaign's projects when it is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CascadePolicy {
    /// Delete the projects and their tasks
    DeleteProjects,

    /// Keep the projects and tasks, unlinked from the campaign
    #[default]
    DetachProjects,
}

impl CascadePolicy {
    /// Maps the `delete_projects` request flag
    pub fn from_delete_projects(delete_projects: bool) -> Self {
        if delete_projects {
            CascadePolicy::DeleteProjects
        } else {
            CascadePolicy::DetachProjects
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CascadePolicy::DeleteProjects => "delete_projects",
            CascadePolicy::DetachProjects => "detach_projects",
        }
    }
}

/// Deletes a campaign, resolving its projects per `policy`
///
/// Deleting a campaign that does not exist succeeds.
///
/// # Errors
///
/// [`PlanningError::Upstream`] naming the first store call that failed
pub async fn delete_campaign(
    store: &dyn DataStore,
    campaign_id: Uuid,
    policy: CascadePolicy,
) -> Result<(), PlanningError> {
    cascade(store, campaign_id, policy).await.map_err(|err| {
        error!(
            campaign_id = %campaign_id,
            policy = policy.as_str(),
            error = ?err,
            "Campaign deletion failed"
        );
        err
    })
}

async fn cascade(
    store: &dyn DataStore,
    campaign_id: Uuid,
    policy: CascadePolicy,
) -> Result<(), PlanningError> {
    match policy {
        CascadePolicy::DeleteProjects => {
            let project_ids = store.project_ids_by_campaign(campaign_id).await?;

            if project_ids.is_empty() {
                debug!(campaign_id = %campaign_id, "Campaign has no projects to delete");
            } else {
                let tasks = store.delete_tasks_by_projects(&project_ids).await?;
                let projects = store.delete_projects_by_campaign(campaign_id).await?;
                debug!(
                    campaign_id = %campaign_id,
                    projects = projects,
                    tasks = tasks,
                    "Deleted campaign projects"
                );
            }
        }
        CascadePolicy::DetachProjects => {
            let detached = store.detach_projects(campaign_id).await?;
            debug!(campaign_id = %campaign_id, projects = detached, "Detached campaign projects");
        }
    }

    let existed = store.delete_campaign(campaign_id).await?;

    info!(
        campaign_id = %campaign_id,
        policy = policy.as_str(),
        existed = existed,
        "Campaign deleted"
    );

    Ok(())
}
