/// Growth plan model and database operations
///
/// A growth plan groups a user's campaigns under one strategic goal.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE growth_plans (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Growth plan row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GrowthPlan {
    pub id: Uuid,

    /// Owner (subject of the auth provider's token)
    pub user_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a growth plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGrowthPlan {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl GrowthPlan {
    /// Creates a new growth plan
    pub async fn create(pool: &PgPool, data: CreateGrowthPlan) -> Result<Self, sqlx::Error> {
        let plan = sqlx::query_as::<_, GrowthPlan>(
            r#"
            INSERT INTO growth_plans (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(plan)
    }

    /// Lists a user's growth plans, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let plans = sqlx::query_as::<_, GrowthPlan>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM growth_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    /// Reads a growth plan owned by `user_id`
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let plan = sqlx::query_as::<_, GrowthPlan>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM growth_plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }
}
