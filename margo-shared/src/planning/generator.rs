/// Work-breakdown generation
///
/// Turns a campaign into concrete projects (one per partitioned period) and
/// tasks (one per project and distribution channel).
///
/// # Writes
///
/// Two bulk inserts, in order: projects, then tasks. They are independent
/// store calls. If the task insert fails, the projects already written stay
/// in place and the caller gets [`PlanningError::Upstream`]. Calling the
/// generator twice for the same campaign creates two separate project sets.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use margo_shared::models::campaign::{CreateCampaign, Frequency};
/// use margo_shared::planning::{generate_projects_for_campaign, GenerateProjects};
/// use margo_shared::store::{DataStore, MemoryStore};
/// use uuid::Uuid;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user_id = Uuid::new_v4();
/// let campaign = store.create_campaign(CreateCampaign {
///     user_id,
///     growth_plan_id: None,
///     tactic_id: None,
///     name: "Newsletter".to_string(),
///     description: None,
///     frequency: Frequency::Monthly,
///     distribution_channels: vec![],
///     start_date: None,
///     end_date: None,
/// }).await?;
///
/// let projects = generate_projects_for_campaign(&store, GenerateProjects {
///     campaign_id: campaign.id,
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
///     frequency: Frequency::Monthly,
///     distribution_channels: vec!["Email".to_string()],
///     user_id,
/// }).await?;
///
/// assert_eq!(projects.len(), 3);
/// assert_eq!(projects[0].name, "Newsletter - Jan 1, 2024");
/// # Ok(())
/// # }
/// ```

use chrono::NaiveDate;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::error::PlanningError;
use super::interval::partition;
use crate::models::{
    campaign::{CampaignWithTactic, Frequency},
    project::{NewProject, Project, ProjectStatus},
    task::{NewTask, TaskStatus},
};
use crate::store::{DataStore, StoreError, StoreErrorKind, StoreOperation};

/// Label used in place of a missing tactic name
const DEFAULT_TACTIC_LABEL: &str = "Content";

/// Most projects one generation may create (a year of daily periods)
pub const MAX_PERIODS: usize = 366;

/// Most distribution channels, and so tasks per project
pub const MAX_CHANNELS: usize = 20;

/// Longest accepted date range, in days
const MAX_RANGE_DAYS: i64 = 36_525;

/// Input of [`generate_projects_for_campaign`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateProjects {
    pub campaign_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    /// Channel names; blank entries are dropped
    pub distribution_channels: Vec<String>,
    /// Recorded as `created_by` on every generated row
    pub user_id: Uuid,
}

/// Generates projects and tasks for a campaign
///
/// # Errors
///
/// - [`PlanningError::Validation`] if `end_date` precedes `start_date`, or
///   the request exceeds [`MAX_PERIODS`] or [`MAX_CHANNELS`]
/// - [`PlanningError::NotFound`] if the campaign does not exist
/// - [`PlanningError::Upstream`] if any store call fails, or the project
///   insert returns no rows
pub async fn generate_projects_for_campaign(
    store: &dyn DataStore,
    request: GenerateProjects,
) -> Result<Vec<Project>, PlanningError> {
    let campaign_id = request.campaign_id;

    generate(store, request).await.map_err(|err| {
        error!(
            campaign_id = %campaign_id,
            kind = err.kind(),
            error = ?err,
            "Project generation failed"
        );
        err
    })
}

async fn generate(
    store: &dyn DataStore,
    request: GenerateProjects,
) -> Result<Vec<Project>, PlanningError> {
    if request.end_date < request.start_date {
        return Err(PlanningError::Validation(format!(
            "end_date {} is before start_date {}",
            request.end_date, request.start_date
        )));
    }

    if (request.end_date - request.start_date).num_days() > MAX_RANGE_DAYS {
        return Err(PlanningError::Validation(format!(
            "date range exceeds {} days",
            MAX_RANGE_DAYS
        )));
    }

    let channels = clean_channels(&request.distribution_channels);
    if channels.len() > MAX_CHANNELS {
        return Err(PlanningError::Validation(format!(
            "{} distribution channels given, at most {} allowed",
            channels.len(),
            MAX_CHANNELS
        )));
    }

    let instants = partition(request.start_date, request.end_date, request.frequency);
    if instants.len() > MAX_PERIODS {
        return Err(PlanningError::Validation(format!(
            "{} {} periods requested, at most {} allowed",
            instants.len(),
            request.frequency,
            MAX_PERIODS
        )));
    }

    let campaign = store
        .find_campaign(request.campaign_id)
        .await?
        .ok_or_else(|| PlanningError::not_found("campaign", request.campaign_id))?;

    debug!(
        campaign_id = %request.campaign_id,
        frequency = %request.frequency,
        periods = instants.len(),
        "Partitioned campaign range"
    );

    let new_projects = build_projects(&campaign, &request, &instants);
    let projects = store.insert_projects(new_projects).await?;

    if projects.is_empty() {
        return Err(PlanningError::upstream(StoreError::new(
            StoreOperation::InsertProjects,
            StoreErrorKind::NoRows,
        )));
    }

    let new_tasks = build_tasks(&projects, &channels, campaign.tactic_name.as_deref(), request.user_id);
    let task_count = new_tasks.len();

    if !new_tasks.is_empty() {
        store.insert_tasks(new_tasks).await?;
    }

    info!(
        campaign_id = %request.campaign_id,
        projects = projects.len(),
        tasks = task_count,
        "Generated campaign projects"
    );

    Ok(projects)
}

fn clean_channels(channels: &[String]) -> Vec<String> {
    channels
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// One project per period start
pub fn build_projects(
    campaign: &CampaignWithTactic,
    request: &GenerateProjects,
    instants: &[NaiveDate],
) -> Vec<NewProject> {
    let name = &campaign.campaign.name;

    instants
        .iter()
        .map(|instant| {
            let end_date = match request.frequency {
                Frequency::Once => Some(request.end_date),
                frequency => frequency.period_end(*instant),
            };

            NewProject {
                campaign_id: Some(request.campaign_id),
                name: format!("{} - {}", name, instant.format("%b %-d, %Y")),
                description: Some(format!("Generated from campaign: {}", name)),
                start_date: Some(*instant),
                end_date,
                status: ProjectStatus::Draft,
                created_by: request.user_id,
            }
        })
        .collect()
}

/// One task per project and channel, project-major
pub fn build_tasks(
    projects: &[Project],
    channels: &[String],
    tactic_name: Option<&str>,
    user_id: Uuid,
) -> Vec<NewTask> {
    let label = tactic_name.unwrap_or(DEFAULT_TACTIC_LABEL);
    let description_label = tactic_name.map_or_else(
        || DEFAULT_TACTIC_LABEL.to_lowercase(),
        str::to_string,
    );

    projects
        .iter()
        .flat_map(|project| {
            channels.iter().map(move |channel| (project.id, channel))
        })
        .map(|(project_id, channel)| NewTask {
            project_id,
            name: format!("{} - {}", channel, label),
            description: Some(format!(
                "Create and publish {} for {}",
                description_label, channel
            )),
            status: TaskStatus::Todo,
            created_by: user_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::campaign::{Campaign, CampaignStatus};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn campaign(tactic_name: Option<&str>) -> CampaignWithTactic {
        let now = Utc::now();
        CampaignWithTactic {
            campaign: Campaign {
                id: Uuid::new_v4(),
                growth_plan_id: None,
                user_id: Uuid::new_v4(),
                tactic_id: None,
                name: "Spring Launch".to_string(),
                description: None,
                frequency: Frequency::Weekly,
                distribution_channels: vec![],
                start_date: None,
                end_date: None,
                status: CampaignStatus::Active,
                created_at: now,
                updated_at: now,
            },
            tactic_name: tactic_name.map(str::to_string),
        }
    }

    fn request(frequency: Frequency) -> GenerateProjects {
        GenerateProjects {
            campaign_id: Uuid::new_v4(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            frequency,
            distribution_channels: vec![],
            user_id: Uuid::new_v4(),
        }
    }

    fn project(id: Uuid) -> Project {
        let now = Utc::now();
        Project {
            id,
            campaign_id: None,
            name: String::new(),
            description: None,
            start_date: None,
            end_date: None,
            status: ProjectStatus::Draft,
            created_by: Uuid::nil(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_project_names_and_periods() {
        let req = request(Frequency::Weekly);
        let rows = build_projects(&campaign(None), &req, &[date(2024, 1, 1), date(2024, 1, 7)]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Spring Launch - Jan 1, 2024");
        assert_eq!(rows[1].name, "Spring Launch - Jan 7, 2024");
        assert_eq!(
            rows[0].description.as_deref(),
            Some("Generated from campaign: Spring Launch")
        );
        assert_eq!(rows[0].end_date, Some(date(2024, 1, 8)));
        assert_eq!(rows[0].campaign_id, Some(req.campaign_id));
        assert_eq!(rows[0].status, ProjectStatus::Draft);
        assert_eq!(rows[0].created_by, req.user_id);
    }

    #[test]
    fn test_once_project_ends_at_campaign_end() {
        let req = request(Frequency::Once);
        let rows = build_projects(&campaign(None), &req, &[req.start_date]);
        assert_eq!(rows[0].end_date, Some(req.end_date));
    }

    #[test]
    fn test_task_labels_use_tactic_name() {
        let projects = vec![project(Uuid::new_v4())];
        let channels = vec!["LinkedIn".to_string()];

        let rows = build_tasks(&projects, &channels, Some("Webinar"), Uuid::nil());
        assert_eq!(rows[0].name, "LinkedIn - Webinar");
        assert_eq!(
            rows[0].description.as_deref(),
            Some("Create and publish Webinar for LinkedIn")
        );
        assert_eq!(rows[0].status, TaskStatus::Todo);
    }

    #[test]
    fn test_task_labels_without_tactic() {
        let projects = vec![project(Uuid::new_v4())];
        let channels = vec!["Email".to_string()];

        let rows = build_tasks(&projects, &channels, None, Uuid::nil());
        assert_eq!(rows[0].name, "Email - Content");
        assert_eq!(
            rows[0].description.as_deref(),
            Some("Create and publish content for Email")
        );
    }

    #[test]
    fn test_tasks_are_projects_times_channels() {
        let projects: Vec<Project> = (0..3).map(|_| project(Uuid::new_v4())).collect();
        let channels = vec!["Email".to_string(), "Blog".to_string()];

        let rows = build_tasks(&projects, &channels, None, Uuid::nil());
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].project_id, projects[0].id);
        assert_eq!(rows[1].project_id, projects[0].id);
        assert_eq!(rows[2].project_id, projects[1].id);
    }

    #[test]
    fn test_blank_channels_are_dropped() {
        let cleaned = clean_channels(&[
            " Email ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Blog".to_string(),
        ]);
        assert_eq!(cleaned, vec!["Email".to_string(), "Blog".to_string()]);
    }
}
