/// PostgreSQL implementation of [`DataStore`]
///
/// Thin adapter over the model functions: each trait method is one query,
/// and sqlx errors are tagged with the [`StoreOperation`] that raised them.
///
/// # Example
///
/// ```no_run
/// use margo_shared::db::pool::{create_pool, DatabaseConfig};
/// use margo_shared::store::{DataStore, PgStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DataStore, StoreError, StoreOperation, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    campaign::{Campaign, CampaignWithTactic, CreateCampaign},
    growth_plan::{CreateGrowthPlan, GrowthPlan},
    project::{NewProject, Project},
    tactic::{CreateTactic, Tactic},
    task::{NewTask, Task},
};

/// Data store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn tag(operation: StoreOperation) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| StoreError::new(operation, err)
}

#[async_trait]
impl DataStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(tag(StoreOperation::Ping))
    }

    async fn create_growth_plan(&self, data: CreateGrowthPlan) -> StoreResult<GrowthPlan> {
        GrowthPlan::create(&self.pool, data)
            .await
            .map_err(tag(StoreOperation::CreateGrowthPlan))
    }

    async fn find_growth_plan(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<GrowthPlan>> {
        GrowthPlan::find_owned(&self.pool, id, user_id)
            .await
            .map_err(tag(StoreOperation::FindGrowthPlan))
    }

    async fn list_growth_plans(&self, user_id: Uuid) -> StoreResult<Vec<GrowthPlan>> {
        GrowthPlan::list_by_user(&self.pool, user_id)
            .await
            .map_err(tag(StoreOperation::ListGrowthPlans))
    }

    async fn create_tactic(&self, data: CreateTactic) -> StoreResult<Tactic> {
        Tactic::create(&self.pool, data)
            .await
            .map_err(tag(StoreOperation::CreateTactic))
    }

    async fn find_tactic(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Tactic>> {
        Tactic::find_owned(&self.pool, id, user_id)
            .await
            .map_err(tag(StoreOperation::FindTactic))
    }

    async fn list_tactics(&self, user_id: Uuid) -> StoreResult<Vec<Tactic>> {
        Tactic::list_by_user(&self.pool, user_id)
            .await
            .map_err(tag(StoreOperation::ListTactics))
    }

    async fn create_campaign(&self, data: CreateCampaign) -> StoreResult<Campaign> {
        Campaign::create(&self.pool, data)
            .await
            .map_err(tag(StoreOperation::CreateCampaign))
    }

    async fn find_campaign(&self, id: Uuid) -> StoreResult<Option<CampaignWithTactic>> {
        Campaign::find_with_tactic(&self.pool, id)
            .await
            .map_err(tag(StoreOperation::FindCampaign))
    }

    async fn list_campaigns(&self, user_id: Uuid) -> StoreResult<Vec<Campaign>> {
        Campaign::list_by_user(&self.pool, user_id)
            .await
            .map_err(tag(StoreOperation::ListCampaigns))
    }

    async fn insert_projects(&self, rows: Vec<NewProject>) -> StoreResult<Vec<Project>> {
        Project::insert_many(&self.pool, &rows)
            .await
            .map_err(tag(StoreOperation::InsertProjects))
    }

    async fn list_projects_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Project>> {
        Project::list_by_campaign(&self.pool, campaign_id)
            .await
            .map_err(tag(StoreOperation::ListProjects))
    }

    async fn project_ids_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Uuid>> {
        Project::ids_by_campaign(&self.pool, campaign_id)
            .await
            .map_err(tag(StoreOperation::ListProjectIds))
    }

    async fn detach_projects(&self, campaign_id: Uuid) -> StoreResult<u64> {
        Project::detach_from_campaign(&self.pool, campaign_id)
            .await
            .map_err(tag(StoreOperation::DetachProjects))
    }

    async fn delete_projects_by_campaign(&self, campaign_id: Uuid) -> StoreResult<u64> {
        Project::delete_by_campaign(&self.pool, campaign_id)
            .await
            .map_err(tag(StoreOperation::DeleteProjects))
    }

    async fn insert_tasks(&self, rows: Vec<NewTask>) -> StoreResult<Vec<Task>> {
        Task::insert_many(&self.pool, &rows)
            .await
            .map_err(tag(StoreOperation::InsertTasks))
    }

    async fn list_tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        Task::list_by_project(&self.pool, project_id)
            .await
            .map_err(tag(StoreOperation::ListTasks))
    }

    async fn delete_tasks_by_projects(&self, project_ids: &[Uuid]) -> StoreResult<u64> {
        Task::delete_by_projects(&self.pool, project_ids)
            .await
            .map_err(tag(StoreOperation::DeleteTasks))
    }

    async fn delete_campaign(&self, id: Uuid) -> StoreResult<bool> {
        Campaign::delete(&self.pool, id)
            .await
            .map_err(tag(StoreOperation::DeleteCampaign))
    }
}
