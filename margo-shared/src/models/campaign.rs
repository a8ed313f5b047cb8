/// Campaign model and database operations
///
/// A campaign is a marketing initiative with a date range, a cadence
/// (`frequency`) and the distribution channels its content is published on.
/// Campaigns are the input of the work-breakdown generator in
/// [`crate::planning`].
///
/// # Schema
///
/// ```sql
/// CREATE TYPE campaign_frequency AS ENUM (
///     'once', 'daily', 'weekly', 'monthly', 'quarterly', 'yearly'
/// );
///
/// CREATE TABLE campaigns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     growth_plan_id UUID REFERENCES growth_plans(id) ON DELETE SET NULL,
///     user_id UUID NOT NULL,
///     tactic_id UUID REFERENCES tactics(id) ON DELETE SET NULL,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     frequency campaign_frequency NOT NULL DEFAULT 'monthly',
///     distribution_channels TEXT[] NOT NULL DEFAULT '{}',
///     start_date DATE,
///     end_date DATE,
///     status campaign_status NOT NULL DEFAULT 'draft',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use margo_shared::models::campaign::{Campaign, CreateCampaign, Frequency};
/// use margo_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let campaign = Campaign::create(&pool, CreateCampaign {
///     user_id: Uuid::new_v4(),
///     growth_plan_id: None,
///     tactic_id: None,
///     name: "Spring launch".to_string(),
///     description: None,
///     frequency: Frequency::Weekly,
///     distribution_channels: vec!["Email".to_string(), "Social".to_string()],
///     start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
///     end_date: NaiveDate::from_ymd_opt(2024, 5, 31),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

/// Cadence at which a campaign's work is subdivided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// A single period covering the whole campaign
    Once,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Converts frequency to its database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Parses a frequency from its string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "once" => Some(Frequency::Once),
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "quarterly" => Some(Frequency::Quarterly),
            "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

/// Campaign row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    /// Unique campaign ID
    pub id: Uuid,

    /// Growth plan this campaign belongs to (if any)
    pub growth_plan_id: Option<Uuid>,

    /// Owner of the campaign
    pub user_id: Uuid,

    /// Tactic describing the content this campaign produces
    pub tactic_id: Option<Uuid>,

    pub name: String,

    pub description: Option<String>,

    /// Cadence used when generating projects
    pub frequency: Frequency,

    /// Outlets the campaign publishes on (e.g. "Email", "Social")
    pub distribution_channels: Vec<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub status: CampaignStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A campaign joined with the name of its tactic
///
/// The tactic name is only used to label generated tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignWithTactic {
    #[serde(flatten)]
    pub campaign: Campaign,

    /// Name of the linked tactic, `None` when the campaign has no tactic
    pub tactic_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct CampaignTacticRow {
    #[sqlx(flatten)]
    campaign: Campaign,
    tactic_name: Option<String>,
}

/// Input for creating a new campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub user_id: Uuid,
    pub growth_plan_id: Option<Uuid>,
    pub tactic_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub distribution_channels: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

const CAMPAIGN_COLUMNS: &str = "id, growth_plan_id, user_id, tactic_id, name, description, \
     frequency, distribution_channels, start_date, end_date, status, created_at, updated_at";

impl Campaign {
    /// Creates a new campaign in draft status
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(pool: &PgPool, data: CreateCampaign) -> Result<Self, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (user_id, growth_plan_id, tactic_id, name, description,
                                   frequency, distribution_channels, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CAMPAIGN_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.growth_plan_id)
        .bind(data.tactic_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.frequency)
        .bind(data.distribution_channels)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(pool)
        .await?;

        Ok(campaign)
    }

    /// Finds a campaign by ID together with its tactic name
    ///
    /// A tactic owned by someone else than the campaign owner is not joined.
    pub async fn find_with_tactic(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CampaignWithTactic>, sqlx::Error> {
        let row = sqlx::query_as::<_, CampaignTacticRow>(
            r#"
            SELECT c.id, c.growth_plan_id, c.user_id, c.tactic_id, c.name, c.description,
                   c.frequency, c.distribution_channels, c.start_date, c.end_date, c.status,
                   c.created_at, c.updated_at,
                   t.name AS tactic_name
            FROM campaigns c
            LEFT JOIN tactics t ON t.id = c.tactic_id AND t.user_id = c.user_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| CampaignWithTactic {
            campaign: r.campaign,
            tactic_name: r.tactic_name,
        }))
    }

    /// Lists a user's campaigns, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let campaigns = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(campaigns)
    }

    /// Deletes a campaign row
    ///
    /// Descendant projects are not touched here; see
    /// [`crate::planning::cascade`] for the policy that resolves them first.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
