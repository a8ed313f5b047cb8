/// Integration tests for project generation and campaign deletion
///
/// Run against the in-memory store, so no database is needed.

use chrono::NaiveDate;
use margo_shared::models::campaign::{Campaign, CreateCampaign, Frequency};
use margo_shared::models::project::ProjectStatus;
use margo_shared::models::tactic::CreateTactic;
use margo_shared::models::task::TaskStatus;
use margo_shared::planning::{
    delete_campaign, generate_projects_for_campaign, CascadePolicy, GenerateProjects,
    PlanningError,
};
use margo_shared::store::{DataStore, MemoryStore, StoreOperation};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_campaign(store: &MemoryStore, tactic: Option<&str>) -> Campaign {
    let user_id = Uuid::new_v4();

    let tactic_id = match tactic {
        Some(name) => Some(
            store
                .create_tactic(CreateTactic {
                    user_id,
                    name: name.to_string(),
                    description: None,
                })
                .await
                .unwrap()
                .id,
        ),
        None => None,
    };

    store
        .create_campaign(CreateCampaign {
            user_id,
            growth_plan_id: None,
            tactic_id,
            name: "Spring Launch".to_string(),
            description: None,
            frequency: Frequency::Weekly,
            distribution_channels: vec![],
            start_date: None,
            end_date: None,
        })
        .await
        .unwrap()
}

fn weekly_january(campaign: &Campaign, channels: &[&str]) -> GenerateProjects {
    GenerateProjects {
        campaign_id: campaign.id,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        frequency: Frequency::Weekly,
        distribution_channels: channels.iter().map(|c| c.to_string()).collect(),
        user_id: campaign.user_id,
    }
}

#[tokio::test]
async fn test_generates_project_per_period_and_task_per_channel() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, Some("Webinar")).await;

    let projects = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email", "Social"]))
        .await
        .unwrap();

    assert_eq!(projects.len(), 5);
    assert_eq!(store.tasks().len(), 10);

    let starts: Vec<_> = projects.iter().filter_map(|p| p.start_date).collect();
    assert_eq!(
        starts,
        vec![
            date(2024, 1, 1),
            date(2024, 1, 7),
            date(2024, 1, 14),
            date(2024, 1, 21),
            date(2024, 1, 28),
        ]
    );
    assert!(projects.iter().all(|p| p.campaign_id == Some(campaign.id)));
    assert!(projects.iter().all(|p| p.status == ProjectStatus::Draft));
    assert!(projects.iter().all(|p| p.created_by == campaign.user_id));

    for project in &projects {
        let tasks = store.list_tasks_by_project(project.id).await.unwrap();
        let mut names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Email - Webinar", "Social - Webinar"]);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Todo));
    }

    assert_eq!(store.calls(StoreOperation::InsertProjects), 1);
    assert_eq!(store.calls(StoreOperation::InsertTasks), 1);
}

#[tokio::test]
async fn test_monthly_and_quarterly_counts() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;

    let monthly = generate_projects_for_campaign(
        &store,
        GenerateProjects {
            start_date: date(2024, 1, 15),
            end_date: date(2024, 4, 15),
            frequency: Frequency::Monthly,
            ..weekly_january(&campaign, &["Email"])
        },
    )
    .await
    .unwrap();
    assert_eq!(monthly.len(), 4);
    assert_eq!(monthly[0].name, "Spring Launch - Jan 15, 2024");
    assert_eq!(monthly[1].name, "Spring Launch - Feb 1, 2024");

    let quarterly = generate_projects_for_campaign(
        &store,
        GenerateProjects {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            frequency: Frequency::Quarterly,
            ..weekly_january(&campaign, &["Email"])
        },
    )
    .await
    .unwrap();
    assert_eq!(quarterly.len(), 4);
    assert_eq!(quarterly[3].start_date, Some(date(2024, 10, 1)));
    assert_eq!(quarterly[3].end_date, Some(date(2025, 1, 1)));
}

#[tokio::test]
async fn test_no_channels_creates_projects_without_tasks() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;

    let projects = generate_projects_for_campaign(&store, weekly_january(&campaign, &["  ", ""]))
        .await
        .unwrap();

    assert_eq!(projects.len(), 5);
    assert!(store.tasks().is_empty());
    assert_eq!(store.calls(StoreOperation::InsertTasks), 0);
}

#[tokio::test]
async fn test_missing_tactic_uses_content_label() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;

    generate_projects_for_campaign(&store, weekly_january(&campaign, &["Blog"]))
        .await
        .unwrap();

    let task = &store.tasks()[0];
    assert_eq!(task.name, "Blog - Content");
    assert_eq!(
        task.description.as_deref(),
        Some("Create and publish content for Blog")
    );
}

#[tokio::test]
async fn test_generating_twice_duplicates_projects() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;

    let first = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap();
    let second = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap();

    assert_eq!(first.len(), second.len());
    assert!(first.iter().all(|a| second.iter().all(|b| a.id != b.id)));
    assert_eq!(store.projects().len(), 10);
    assert_eq!(store.tasks().len(), 10);
}

#[tokio::test]
async fn test_unknown_campaign_is_not_found() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    let request = GenerateProjects {
        campaign_id: Uuid::new_v4(),
        ..weekly_january(&campaign, &["Email"])
    };

    let err = generate_projects_for_campaign(&store, request).await.unwrap_err();

    assert!(matches!(err, PlanningError::NotFound { entity: "campaign", .. }));
    assert_eq!(store.calls(StoreOperation::InsertProjects), 0);
}

#[tokio::test]
async fn test_inverted_range_is_rejected_before_store_access() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    let request = GenerateProjects {
        start_date: date(2024, 2, 1),
        end_date: date(2024, 1, 1),
        ..weekly_january(&campaign, &["Email"])
    };

    let err = generate_projects_for_campaign(&store, request).await.unwrap_err();

    assert!(matches!(err, PlanningError::Validation(_)));
    assert_eq!(store.calls(StoreOperation::FindCampaign), 0);
}

#[tokio::test]
async fn test_too_many_periods_are_rejected_before_store_access() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    let request = GenerateProjects {
        start_date: date(2000, 1, 1),
        end_date: date(2030, 1, 1),
        frequency: Frequency::Daily,
        ..weekly_january(&campaign, &["Email"])
    };

    let err = generate_projects_for_campaign(&store, request).await.unwrap_err();

    assert!(matches!(err, PlanningError::Validation(_)));
    assert_eq!(store.calls(StoreOperation::FindCampaign), 0);
    assert!(store.projects().is_empty());
}

#[tokio::test]
async fn test_a_full_year_of_daily_periods_is_accepted() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    let request = GenerateProjects {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        frequency: Frequency::Daily,
        ..weekly_january(&campaign, &["Email"])
    };

    let projects = generate_projects_for_campaign(&store, request).await.unwrap();

    assert_eq!(projects.len(), 366);
    assert_eq!(store.tasks().len(), 366);
}

#[tokio::test]
async fn test_too_many_channels_are_rejected() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    let channels: Vec<String> = (0..21).map(|i| format!("Channel {i}")).collect();
    let request = GenerateProjects {
        distribution_channels: channels,
        ..weekly_january(&campaign, &[])
    };

    let err = generate_projects_for_campaign(&store, request).await.unwrap_err();

    assert!(matches!(err, PlanningError::Validation(_)));
    assert!(store.projects().is_empty());
}

#[tokio::test]
async fn test_campaign_lookup_failure_is_upstream() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    store.fail_on(StoreOperation::FindCampaign);

    let err = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlanningError::Upstream { operation: StoreOperation::FindCampaign, .. }
    ));
}

#[tokio::test]
async fn test_empty_project_insert_is_upstream() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    store.return_no_rows_on(StoreOperation::InsertProjects);

    let err = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlanningError::Upstream { operation: StoreOperation::InsertProjects, .. }
    ));
    assert_eq!(store.calls(StoreOperation::InsertTasks), 0);
}

#[tokio::test]
async fn test_task_insert_failure_leaves_projects_behind() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    store.fail_on(StoreOperation::InsertTasks);

    let err = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlanningError::Upstream { operation: StoreOperation::InsertTasks, .. }
    ));
    assert_eq!(store.projects().len(), 5);
    assert!(store.tasks().is_empty());
}

#[tokio::test]
async fn test_delete_with_projects_removes_everything() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    let other = seed_campaign(&store, None).await;

    generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email", "Blog"]))
        .await
        .unwrap();
    generate_projects_for_campaign(&store, weekly_january(&other, &["Email"]))
        .await
        .unwrap();

    delete_campaign(&store, campaign.id, CascadePolicy::DeleteProjects)
        .await
        .unwrap();

    assert!(store.find_campaign(campaign.id).await.unwrap().is_none());
    assert!(store.projects().iter().all(|p| p.campaign_id == Some(other.id)));
    assert_eq!(store.projects().len(), 5);
    assert_eq!(store.tasks().len(), 5);
}

#[tokio::test]
async fn test_detach_keeps_projects_and_tasks() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;

    let projects = generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap();

    delete_campaign(&store, campaign.id, CascadePolicy::DetachProjects)
        .await
        .unwrap();

    assert!(store.campaigns().is_empty());
    let remaining = store.projects();
    assert_eq!(remaining.len(), projects.len());
    assert!(remaining.iter().all(|p| p.campaign_id.is_none()));
    assert_eq!(store.tasks().len(), 5);
}

#[tokio::test]
async fn test_delete_campaign_without_projects() {
    for policy in [CascadePolicy::DeleteProjects, CascadePolicy::DetachProjects] {
        let store = MemoryStore::new();
        let campaign = seed_campaign(&store, None).await;

        delete_campaign(&store, campaign.id, policy).await.unwrap();

        assert!(store.campaigns().is_empty());
        assert_eq!(store.calls(StoreOperation::DeleteTasks), 0);
        assert_eq!(store.calls(StoreOperation::DeleteProjects), 0);
    }
}

#[tokio::test]
async fn test_delete_missing_campaign_succeeds() {
    let store = MemoryStore::new();

    delete_campaign(&store, Uuid::new_v4(), CascadePolicy::DeleteProjects)
        .await
        .unwrap();
    assert_eq!(store.calls(StoreOperation::DeleteCampaign), 1);
}

#[tokio::test]
async fn test_task_delete_failure_keeps_campaign() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    generate_projects_for_campaign(&store, weekly_january(&campaign, &["Email"]))
        .await
        .unwrap();
    store.fail_on(StoreOperation::DeleteTasks);

    let err = delete_campaign(&store, campaign.id, CascadePolicy::DeleteProjects)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlanningError::Upstream { operation: StoreOperation::DeleteTasks, .. }
    ));
    assert_eq!(store.campaigns().len(), 1);
    assert_eq!(store.projects().len(), 5);
    assert_eq!(store.calls(StoreOperation::DeleteCampaign), 0);
}

#[tokio::test]
async fn test_campaign_delete_failure_after_detach() {
    let store = MemoryStore::new();
    let campaign = seed_campaign(&store, None).await;
    generate_projects_for_campaign(&store, weekly_january(&campaign, &[]))
        .await
        .unwrap();
    store.fail_on(StoreOperation::DeleteCampaign);

    let err = delete_campaign(&store, campaign.id, CascadePolicy::DetachProjects)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlanningError::Upstream { operation: StoreOperation::DeleteCampaign, .. }
    ));
    assert_eq!(store.campaigns().len(), 1);
    assert!(store.projects().iter().all(|p| p.campaign_id.is_none()));
}
