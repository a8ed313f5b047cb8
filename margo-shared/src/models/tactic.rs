/// Tactic model and database operations
///
/// A tactic is the content descriptor a campaign points at (e.g. "Blog post",
/// "Product webinar"). Its name labels the tasks generated for a campaign.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tactics (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tactic row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tactic {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a tactic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTactic {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl Tactic {
    pub async fn create(pool: &PgPool, data: CreateTactic) -> Result<Self, sqlx::Error> {
        let tactic = sqlx::query_as::<_, Tactic>(
            r#"
            INSERT INTO tactics (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(tactic)
    }

    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tactics = sqlx::query_as::<_, Tactic>(
            "SELECT id, user_id, name, description, created_at FROM tactics WHERE user_id = $1 ORDER BY name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tactics)
    }

    /// Reads a tactic owned by `user_id`
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tactic = sqlx::query_as::<_, Tactic>(
            "SELECT id, user_id, name, description, created_at FROM tactics WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(tactic)
    }
}
