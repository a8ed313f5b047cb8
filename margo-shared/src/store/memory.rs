/// In-memory implementation of [`DataStore`]
///
/// Used by tests and local demos. Tables are plain vectors behind a mutex
/// that is never held across an await point.
///
/// # Fault Injection
///
/// Any operation can be made to fail ([`MemoryStore::fail_on`]) or, for bulk
/// inserts, to report success with zero rows
/// ([`MemoryStore::return_no_rows_on`]). Faults stay armed until
/// [`MemoryStore::clear_faults`] is called.
///
/// # Example
///
/// ```
/// use margo_shared::store::{MemoryStore, StoreOperation};
///
/// let store = MemoryStore::new();
/// store.fail_on(StoreOperation::InsertTasks);
/// assert_eq!(store.calls(StoreOperation::InsertTasks), 0);
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{DataStore, StoreError, StoreErrorKind, StoreOperation, StoreResult};
use crate::models::{
    campaign::{Campaign, CampaignStatus, CampaignWithTactic, CreateCampaign},
    growth_plan::{CreateGrowthPlan, GrowthPlan},
    project::{NewProject, Project},
    tactic::{CreateTactic, Tactic},
    task::{NewTask, Task},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    Error,
    NoRows,
}

#[derive(Debug, Default)]
struct Tables {
    growth_plans: Vec<GrowthPlan>,
    tactics: Vec<Tactic>,
    campaigns: Vec<Campaign>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    faults: HashMap<StoreOperation, Fault>,
    calls: HashMap<StoreOperation, usize>,
}

/// Data store holding every table in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call to `operation` fail
    pub fn fail_on(&self, operation: StoreOperation) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.faults.insert(operation, Fault::Error);
        }
    }

    /// Makes a bulk insert succeed without returning (or storing) any row
    pub fn return_no_rows_on(&self, operation: StoreOperation) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.faults.insert(operation, Fault::NoRows);
        }
    }

    /// Disarms every injected fault
    pub fn clear_faults(&self) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.faults.clear();
        }
    }

    /// Number of times `operation` was invoked, including failed calls
    pub fn calls(&self, operation: StoreOperation) -> usize {
        self.tables
            .lock()
            .map(|t| t.calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Snapshot of the campaigns table
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.tables.lock().map(|t| t.campaigns.clone()).unwrap_or_default()
    }

    /// Snapshot of the projects table
    pub fn projects(&self) -> Vec<Project> {
        self.tables.lock().map(|t| t.projects.clone()).unwrap_or_default()
    }

    /// Snapshot of the tasks table
    pub fn tasks(&self) -> Vec<Task> {
        self.tables.lock().map(|t| t.tasks.clone()).unwrap_or_default()
    }

    /// Locks the tables, records the call and applies any armed fault
    ///
    /// Returns `Ok(None)` when the call must succeed with no rows.
    fn begin(
        &self,
        operation: StoreOperation,
    ) -> StoreResult<Option<MutexGuard<'_, Tables>>> {
        let mut tables = self.tables.lock().map_err(|_| {
            StoreError::new(
                operation,
                StoreErrorKind::Unavailable("memory store lock poisoned".to_string()),
            )
        })?;

        *tables.calls.entry(operation).or_insert(0) += 1;

        match tables.faults.get(&operation) {
            Some(Fault::Error) => Err(StoreError::new(
                operation,
                StoreErrorKind::Injected(format!("{} rejected by fault injection", operation)),
            )),
            Some(Fault::NoRows) => Ok(None),
            None => Ok(Some(tables)),
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.begin(StoreOperation::Ping)?;
        Ok(())
    }

    async fn create_growth_plan(&self, data: CreateGrowthPlan) -> StoreResult<GrowthPlan> {
        let Some(mut tables) = self.begin(StoreOperation::CreateGrowthPlan)? else {
            return Err(no_row(StoreOperation::CreateGrowthPlan));
        };

        let now = Utc::now();
        let plan = GrowthPlan {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        };
        tables.growth_plans.push(plan.clone());

        Ok(plan)
    }

    async fn find_growth_plan(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<GrowthPlan>> {
        let Some(tables) = self.begin(StoreOperation::FindGrowthPlan)? else {
            return Ok(None);
        };

        Ok(tables
            .growth_plans
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn list_growth_plans(&self, user_id: Uuid) -> StoreResult<Vec<GrowthPlan>> {
        let Some(tables) = self.begin(StoreOperation::ListGrowthPlans)? else {
            return Ok(Vec::new());
        };

        Ok(tables
            .growth_plans
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_tactic(&self, data: CreateTactic) -> StoreResult<Tactic> {
        let Some(mut tables) = self.begin(StoreOperation::CreateTactic)? else {
            return Err(no_row(StoreOperation::CreateTactic));
        };

        let tactic = Tactic {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            created_at: Utc::now(),
        };
        tables.tactics.push(tactic.clone());

        Ok(tactic)
    }

    async fn find_tactic(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Tactic>> {
        let Some(tables) = self.begin(StoreOperation::FindTactic)? else {
            return Ok(None);
        };

        Ok(tables
            .tactics
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list_tactics(&self, user_id: Uuid) -> StoreResult<Vec<Tactic>> {
        let Some(tables) = self.begin(StoreOperation::ListTactics)? else {
            return Ok(Vec::new());
        };

        let mut tactics: Vec<Tactic> = tables
            .tactics
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tactics.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(tactics)
    }

    async fn create_campaign(&self, data: CreateCampaign) -> StoreResult<Campaign> {
        let Some(mut tables) = self.begin(StoreOperation::CreateCampaign)? else {
            return Err(no_row(StoreOperation::CreateCampaign));
        };

        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            growth_plan_id: data.growth_plan_id,
            user_id: data.user_id,
            tactic_id: data.tactic_id,
            name: data.name,
            description: data.description,
            frequency: data.frequency,
            distribution_channels: data.distribution_channels,
            start_date: data.start_date,
            end_date: data.end_date,
            status: CampaignStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        tables.campaigns.push(campaign.clone());

        Ok(campaign)
    }

    async fn find_campaign(&self, id: Uuid) -> StoreResult<Option<CampaignWithTactic>> {
        let Some(tables) = self.begin(StoreOperation::FindCampaign)? else {
            return Ok(None);
        };

        Ok(tables.campaigns.iter().find(|c| c.id == id).map(|campaign| {
            let tactic_name = campaign.tactic_id.and_then(|tactic_id| {
                tables
                    .tactics
                    .iter()
                    .find(|t| t.id == tactic_id && t.user_id == campaign.user_id)
                    .map(|t| t.name.clone())
            });

            CampaignWithTactic {
                campaign: campaign.clone(),
                tactic_name,
            }
        }))
    }

    async fn list_campaigns(&self, user_id: Uuid) -> StoreResult<Vec<Campaign>> {
        let Some(tables) = self.begin(StoreOperation::ListCampaigns)? else {
            return Ok(Vec::new());
        };

        Ok(tables
            .campaigns
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_projects(&self, rows: Vec<NewProject>) -> StoreResult<Vec<Project>> {
        let Some(mut tables) = self.begin(StoreOperation::InsertProjects)? else {
            return Ok(Vec::new());
        };

        let now = Utc::now();
        let created: Vec<Project> = rows
            .into_iter()
            .map(|row| Project {
                id: Uuid::new_v4(),
                campaign_id: row.campaign_id,
                name: row.name,
                description: row.description,
                start_date: row.start_date,
                end_date: row.end_date,
                status: row.status,
                created_by: row.created_by,
                created_at: now,
                updated_at: now,
            })
            .collect();
        tables.projects.extend(created.iter().cloned());

        Ok(created)
    }

    async fn list_projects_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Project>> {
        let Some(tables) = self.begin(StoreOperation::ListProjects)? else {
            return Ok(Vec::new());
        };

        let mut projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| p.campaign_id == Some(campaign_id))
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.start_date);

        Ok(projects)
    }

    async fn project_ids_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let Some(tables) = self.begin(StoreOperation::ListProjectIds)? else {
            return Ok(Vec::new());
        };

        Ok(tables
            .projects
            .iter()
            .filter(|p| p.campaign_id == Some(campaign_id))
            .map(|p| p.id)
            .collect())
    }

    async fn detach_projects(&self, campaign_id: Uuid) -> StoreResult<u64> {
        let Some(mut tables) = self.begin(StoreOperation::DetachProjects)? else {
            return Ok(0);
        };

        let now = Utc::now();
        let mut detached = 0;
        for project in tables
            .projects
            .iter_mut()
            .filter(|p| p.campaign_id == Some(campaign_id))
        {
            project.campaign_id = None;
            project.updated_at = now;
            detached += 1;
        }

        Ok(detached)
    }

    async fn delete_projects_by_campaign(&self, campaign_id: Uuid) -> StoreResult<u64> {
        let Some(mut tables) = self.begin(StoreOperation::DeleteProjects)? else {
            return Ok(0);
        };

        let removed: HashSet<Uuid> = tables
            .projects
            .iter()
            .filter(|p| p.campaign_id == Some(campaign_id))
            .map(|p| p.id)
            .collect();
        tables.projects.retain(|p| !removed.contains(&p.id));

        // Same as tasks.project_id ... ON DELETE CASCADE
        tables.tasks.retain(|t| !removed.contains(&t.project_id));

        Ok(removed.len() as u64)
    }

    async fn insert_tasks(&self, rows: Vec<NewTask>) -> StoreResult<Vec<Task>> {
        let Some(mut tables) = self.begin(StoreOperation::InsertTasks)? else {
            return Ok(Vec::new());
        };

        // Same constraint as tasks.project_id REFERENCES projects(id)
        let known: HashSet<Uuid> = tables.projects.iter().map(|p| p.id).collect();
        if let Some(orphan) = rows.iter().find(|row| !known.contains(&row.project_id)) {
            return Err(StoreError::new(
                StoreOperation::InsertTasks,
                StoreErrorKind::Constraint(format!(
                    "project {} does not exist",
                    orphan.project_id
                )),
            ));
        }

        let now = Utc::now();
        let created: Vec<Task> = rows
            .into_iter()
            .map(|row| Task {
                id: Uuid::new_v4(),
                project_id: row.project_id,
                name: row.name,
                description: row.description,
                status: row.status,
                created_by: row.created_by,
                created_at: now,
                updated_at: now,
            })
            .collect();
        tables.tasks.extend(created.iter().cloned());

        Ok(created)
    }

    async fn list_tasks_by_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let Some(tables) = self.begin(StoreOperation::ListTasks)? else {
            return Ok(Vec::new());
        };

        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn delete_tasks_by_projects(&self, project_ids: &[Uuid]) -> StoreResult<u64> {
        let Some(mut tables) = self.begin(StoreOperation::DeleteTasks)? else {
            return Ok(0);
        };

        let before = tables.tasks.len();
        tables.tasks.retain(|t| !project_ids.contains(&t.project_id));

        Ok((before - tables.tasks.len()) as u64)
    }

    async fn delete_campaign(&self, id: Uuid) -> StoreResult<bool> {
        let Some(mut tables) = self.begin(StoreOperation::DeleteCampaign)? else {
            return Ok(false);
        };

        let before = tables.campaigns.len();
        tables.campaigns.retain(|c| c.id != id);

        // Same as projects.campaign_id ... ON DELETE SET NULL
        for project in tables.projects.iter_mut().filter(|p| p.campaign_id == Some(id)) {
            project.campaign_id = None;
        }

        Ok(tables.campaigns.len() < before)
    }
}

fn no_row(operation: StoreOperation) -> StoreError {
    StoreError::new(operation, StoreErrorKind::NoRows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::campaign::Frequency;
    use crate::models::project::ProjectStatus;

    fn campaign_input(user_id: Uuid) -> CreateCampaign {
        CreateCampaign {
            user_id,
            growth_plan_id: None,
            tactic_id: None,
            name: "Launch".to_string(),
            description: None,
            frequency: Frequency::Monthly,
            distribution_channels: vec!["Email".to_string()],
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn test_find_campaign_joins_tactic_name() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let tactic = store
            .create_tactic(CreateTactic {
                user_id,
                name: "Webinar".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let campaign = store
            .create_campaign(CreateCampaign {
                tactic_id: Some(tactic.id),
                ..campaign_input(user_id)
            })
            .await
            .unwrap();

        let found = store.find_campaign(campaign.id).await.unwrap().unwrap();
        assert_eq!(found.campaign.id, campaign.id);
        assert_eq!(found.tactic_name.as_deref(), Some("Webinar"));
        assert_eq!(found.campaign.status, CampaignStatus::Draft);
    }

    #[tokio::test]
    async fn test_fail_on_rejects_until_cleared() {
        let store = MemoryStore::new();
        store.fail_on(StoreOperation::Ping);

        let err = store.ping().await.unwrap_err();
        assert_eq!(err.operation, StoreOperation::Ping);
        assert!(matches!(err.kind, StoreErrorKind::Injected(_)));

        store.clear_faults();
        assert!(store.ping().await.is_ok());
        assert_eq!(store.calls(StoreOperation::Ping), 2);
    }

    #[tokio::test]
    async fn test_insert_tasks_rejects_unknown_project() {
        let store = MemoryStore::new();

        let err = store
            .insert_tasks(vec![NewTask {
                project_id: Uuid::new_v4(),
                name: "Email - Content".to_string(),
                description: None,
                status: crate::models::task::TaskStatus::Todo,
                created_by: Uuid::new_v4(),
            }])
            .await
            .unwrap_err();

        assert_eq!(err.operation, StoreOperation::InsertTasks);
        assert!(matches!(err.kind, StoreErrorKind::Constraint(_)));
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_find_campaign_ignores_foreign_tactic() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let foreign = store
            .create_tactic(CreateTactic {
                user_id: Uuid::new_v4(),
                name: "Someone else's plan".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let campaign = store
            .create_campaign(CreateCampaign {
                tactic_id: Some(foreign.id),
                ..campaign_input(owner)
            })
            .await
            .unwrap();

        let found = store.find_campaign(campaign.id).await.unwrap().unwrap();
        assert_eq!(found.tactic_name, None);
        assert!(store.find_tactic(foreign.id, owner).await.unwrap().is_none());
        assert!(store
            .find_tactic(foreign.id, foreign.user_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_find_growth_plan_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let plan = store
            .create_growth_plan(CreateGrowthPlan {
                user_id: owner,
                name: "FY24".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert!(store.find_growth_plan(plan.id, owner).await.unwrap().is_some());
        assert!(store
            .find_growth_plan(plan.id, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_projects_cascades_to_tasks() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let campaign = store.create_campaign(campaign_input(user_id)).await.unwrap();

        let projects = store
            .insert_projects(vec![NewProject {
                campaign_id: Some(campaign.id),
                name: "Launch - Jan 1, 2024".to_string(),
                description: None,
                start_date: None,
                end_date: None,
                status: ProjectStatus::Draft,
                created_by: user_id,
            }])
            .await
            .unwrap();
        store
            .insert_tasks(vec![NewTask {
                project_id: projects[0].id,
                name: "Email - Content".to_string(),
                description: None,
                status: crate::models::task::TaskStatus::Todo,
                created_by: user_id,
            }])
            .await
            .unwrap();

        assert_eq!(store.delete_projects_by_campaign(campaign.id).await.unwrap(), 1);
        assert!(store.projects().is_empty());
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_calls_are_counted_per_operation() {
        let store = MemoryStore::new();

        for _ in 0..3 {
            store.ping().await.unwrap();
        }
        store.list_campaigns(Uuid::new_v4()).await.unwrap();

        assert_eq!(store.calls(StoreOperation::Ping), 3);
        assert_eq!(store.calls(StoreOperation::ListCampaigns), 1);
        assert_eq!(store.calls(StoreOperation::DeleteCampaign), 0);
    }

    #[tokio::test]
    async fn test_return_no_rows_stores_nothing() {
        let store = MemoryStore::new();
        store.return_no_rows_on(StoreOperation::InsertProjects);

        let created = store
            .insert_projects(vec![NewProject {
                campaign_id: None,
                name: "Orphan".to_string(),
                description: None,
                start_date: None,
                end_date: None,
                status: ProjectStatus::Draft,
                created_by: Uuid::new_v4(),
            }])
            .await
            .unwrap();

        assert!(created.is_empty());
        assert!(store.projects().is_empty());
    }

    #[tokio::test]
    async fn test_delete_campaign_reports_missing_row() {
        let store = MemoryStore::new();
        let campaign = store.create_campaign(campaign_input(Uuid::new_v4())).await.unwrap();

        assert!(store.delete_campaign(campaign.id).await.unwrap());
        assert!(!store.delete_campaign(campaign.id).await.unwrap());
        assert!(store.campaigns().is_empty());
    }
}
