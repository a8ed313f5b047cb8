/// Data-store boundary
///
/// Everything that reads or writes planning data goes through the
/// [`DataStore`] trait. Callers receive the store as an explicit handle
/// (usually `Arc<dyn DataStore>`), so handlers and tests can swap the
/// PostgreSQL implementation for the in-memory one.
///
/// # Implementations
///
/// - [`PgStore`]: PostgreSQL via sqlx, delegating to the model functions
/// - [`MemoryStore`]: in-process tables with per-operation failure injection
///
/// # Guarantees
///
/// None across calls. Each method is one independent round trip; the store
/// never opens a transaction spanning several methods.
///
/// # Example
///
/// ```
/// use margo_shared::store::{DataStore, MemoryStore};
/// use std::sync::Arc;
///
/// let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
/// ```

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{
    campaign::{Campaign, CampaignWithTactic, CreateCampaign},
    growth_plan::{CreateGrowthPlan, GrowthPlan},
    project::{NewProject, Project},
    tactic::{CreateTactic, Tactic},
    task::{NewTask, Task},
};

/// Identifies a single data-store call
///
/// Carried by [`StoreError`] so logs and errors name the step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Ping,
    CreateGrowthPlan,
    FindGrowthPlan,
    ListGrowthPlans,
    CreateTactic,
    FindTactic,
    ListTactics,
    CreateCampaign,
    FindCampaign,
    ListCampaigns,
    InsertProjects,
    ListProjects,
    ListProjectIds,
    DetachProjects,
    DeleteProjects,
    InsertTasks,
    ListTasks,
    DeleteTasks,
    DeleteCampaign,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::Ping => "ping",
            StoreOperation::CreateGrowthPlan => "create_growth_plan",
            StoreOperation::FindGrowthPlan => "find_growth_plan",
            StoreOperation::ListGrowthPlans => "list_growth_plans",
            StoreOperation::CreateTactic => "create_tactic",
            StoreOperation::FindTactic => "find_tactic",
            StoreOperation::ListTactics => "list_tactics",
            StoreOperation::CreateCampaign => "create_campaign",
            StoreOperation::FindCampaign => "find_campaign",
            StoreOperation::ListCampaigns => "list_campaigns",
            StoreOperation::InsertProjects => "insert_projects",
            StoreOperation::ListProjects => "list_projects",
            StoreOperation::ListProjectIds => "list_project_ids",
            StoreOperation::DetachProjects => "detach_projects",
            StoreOperation::DeleteProjects => "delete_projects",
            StoreOperation::InsertTasks => "insert_tasks",
            StoreOperation::ListTasks => "list_tasks",
            StoreOperation::DeleteTasks => "delete_tasks",
            StoreOperation::DeleteCampaign => "delete_campaign",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying cause of a store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreErrorKind {
    /// The database rejected or failed the query
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Failure injected by [`MemoryStore::fail_on`]
    #[error("injected failure: {0}")]
    Injected(String),

    /// Store could not be reached or its state is unusable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write broke a table constraint such as a foreign key
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// A write that must produce rows produced none
    #[error("no rows returned")]
    NoRows,
}

/// Error returned by every [`DataStore`] method
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed: {kind}")]
pub struct StoreError {
    /// Which call failed
    pub operation: StoreOperation,

    #[source]
    pub kind: StoreErrorKind,
}

impl StoreError {
    pub fn new(operation: StoreOperation, kind: impl Into<StoreErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
        }
    }

    /// Error message without the operation prefix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Whether the store could not be reached, as opposed to rejecting the call
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::Unavailable(_)
                | StoreErrorKind::Database(
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
        )
    }
}

/// Result alias for store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Capability contract of the relational data store
///
/// Methods map onto the select / insert / update / delete calls the planning
/// code needs. Bulk inserts return the created rows, in input order, with
/// generated IDs.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Checks that the store answers
    async fn ping(&self) -> StoreResult<()>;

    async fn create_growth_plan(&self, data: CreateGrowthPlan) -> StoreResult<GrowthPlan>;

    /// Reads a growth plan if `user_id` owns it
    async fn find_growth_plan(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<GrowthPlan>>;

    async fn list_growth_plans(&self, user_id: Uuid) -> StoreResult<Vec<GrowthPlan>>;

    async fn create_tactic(&self, data: CreateTactic) -> StoreResult<Tactic>;

    /// Reads a tactic if `user_id` owns it
    async fn find_tactic(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Tactic>>;

    async fn list_tactics(&self, user_id: Uuid) -> StoreResult<Vec<Tactic>>;

    async fn create_campaign(&self, data: CreateCampaign) -> StoreResult<Campaign>;

    /// Reads a campaign joined with the name of a tactic of the same owner
    async fn find_campaign(&self, id: Uuid) -> StoreResult<Option<CampaignWithTactic>>;

    async fn list_campaigns(&self, user_id: Uuid) -> StoreResult<Vec<Campaign>>;

    /// Bulk insert; returns the created rows
    async fn insert_projects(&self, rows: Vec<NewProject>) -> StoreResult<Vec<Project>>;

    async fn list_projects_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Project>>;

    async fn project_ids_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Sets `campaign_id = NULL` on the campaign's projects; returns affected rows
    async fn detach_projects(&self, campaign_id: Uuid) -> StoreResult<u64>;

    /// Deletes the campaign's projects; returns affected rows
    async fn delete_projects_by_campaign(&self, campaign_id: Uuid) -> StoreResult<u64>;

    /// Bulk insert; returns the created rows
    async fn insert_tasks(&self, rows: Vec<NewTask>) -> StoreResult<Vec<Task>>;

    async fn list_tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Deletes tasks whose project is in `project_ids`; returns affected rows
    async fn delete_tasks_by_projects(&self, project_ids: &[Uuid]) -> StoreResult<u64>;

    /// Deletes the campaign row; returns whether a row existed
    async fn delete_campaign(&self, id: Uuid) -> StoreResult<bool>;
}
