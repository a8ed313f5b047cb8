/// Database models for Margo
///
/// Each model owns its SQL. Business logic that spans several tables lives in
/// [`crate::planning`] and reaches the database through [`crate::store`].
///
/// # Models
///
/// - `growth_plan`: Strategic plans grouping campaigns
/// - `tactic`: Content descriptors referenced by campaigns
/// - `campaign`: Marketing initiatives with date range, frequency and channels
/// - `project`: Time-boxed units of campaign execution
/// - `task`: Per-channel work items inside a project
///
/// # Example
///
/// ```no_run
/// use margo_shared::models::project::Project;
/// use margo_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let projects = Project::list_by_campaign(&pool, Uuid::new_v4()).await?;
/// # Ok(())
/// # }
/// ```

pub mod campaign;
pub mod growth_plan;
pub mod project;
pub mod tactic;
pub mod task;

/// Most bind parameters PostgreSQL accepts in one statement
const POSTGRES_BIND_LIMIT: usize = 65_535;

/// Rows per multi-row `INSERT` so that a statement stays under the bind limit
pub(crate) fn rows_per_insert(binds_per_row: usize) -> usize {
    (POSTGRES_BIND_LIMIT / binds_per_row.max(1)).max(1)
}
