/// Project model and database operations
///
/// A project is one time-boxed unit of campaign execution. The generator in
/// [`crate::planning::generator`] creates one project per partitioned period.
/// The link to the campaign is nullable: the cascade policy may detach
/// projects instead of deleting them.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('draft', 'active', 'completed', 'archived');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     campaign_id UUID REFERENCES campaigns(id) ON DELETE SET NULL,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     start_date DATE,
///     end_date DATE,
///     status project_status NOT NULL DEFAULT 'draft',
///     created_by UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Freshly generated, not yet scheduled
    Draft,
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

/// Project row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,

    /// Owning campaign; `None` once detached
    pub campaign_id: Option<Uuid>,

    pub name: String,

    pub description: Option<String>,

    /// First day of the period this project covers
    pub start_date: Option<NaiveDate>,

    /// Start of the following period
    pub end_date: Option<NaiveDate>,

    pub status: ProjectStatus,

    /// User who generated or created the project
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub campaign_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub created_by: Uuid,
}

const PROJECT_COLUMNS: &str = "id, campaign_id, name, description, start_date, end_date, \
     status, created_by, created_at, updated_at";

/// Bind parameters per row in [`Project::insert_many`]
const PROJECT_BINDS: usize = 7;

impl Project {
    /// Inserts many projects
    ///
    /// Rows come back in insertion order with their generated IDs. Large
    /// inputs are split into several statements, each committed on its own.
    /// An empty input performs no query.
    pub async fn insert_many(pool: &PgPool, rows: &[NewProject]) -> Result<Vec<Self>, sqlx::Error> {
        let mut projects = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(super::rows_per_insert(PROJECT_BINDS)) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO projects (campaign_id, name, description, start_date, end_date, status, created_by) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(row.campaign_id)
                    .push_bind(&row.name)
                    .push_bind(&row.description)
                    .push_bind(row.start_date)
                    .push_bind(row.end_date)
                    .push_bind(row.status)
                    .push_bind(row.created_by);
            });
            builder.push(" RETURNING ");
            builder.push(PROJECT_COLUMNS);

            projects.extend(builder.build_query_as::<Project>().fetch_all(pool).await?);
        }

        Ok(projects)
    }

    /// Lists projects linked to a campaign, ordered by period
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE campaign_id = $1 ORDER BY start_date, created_at"
        ))
        .bind(campaign_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Returns only the IDs of a campaign's projects
    pub async fn ids_by_campaign(pool: &PgPool, campaign_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM projects WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_all(pool)
            .await?;

        Ok(ids)
    }

    /// Clears `campaign_id` on every project of a campaign
    ///
    /// # Returns
    ///
    /// Number of detached projects
    pub async fn detach_from_campaign(pool: &PgPool, campaign_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET campaign_id = NULL, updated_at = NOW() WHERE campaign_id = $1",
        )
        .bind(campaign_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every project of a campaign
    ///
    /// # Returns
    ///
    /// Number of deleted projects
    pub async fn delete_by_campaign(pool: &PgPool, campaign_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE campaign_id = $1")
            .bind(campaign_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
