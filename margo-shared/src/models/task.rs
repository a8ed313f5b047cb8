/// Task model and database operations
///
/// A task is one per-channel unit of work inside a project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     created_by UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Checks if the task needs no further work
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_by: Uuid,
}

const TASK_COLUMNS: &str =
    "id, project_id, name, description, status, created_by, created_at, updated_at";

const TASK_BINDS: usize = 5;

impl Task {
    /// Inserts many tasks, split into statements under the bind limit
    ///
    /// An empty input performs no query.
    pub async fn insert_many(pool: &PgPool, rows: &[NewTask]) -> Result<Vec<Self>, sqlx::Error> {
        let mut tasks = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(super::rows_per_insert(TASK_BINDS)) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO tasks (project_id, name, description, status, created_by) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(row.project_id)
                    .push_bind(&row.name)
                    .push_bind(&row.description)
                    .push_bind(row.status)
                    .push_bind(row.created_by);
            });
            builder.push(" RETURNING ");
            builder.push(TASK_COLUMNS);

            tasks.extend(builder.build_query_as::<Task>().fetch_all(pool).await?);
        }

        Ok(tasks)
    }

    /// Lists tasks of a project in creation order
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at, name"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes every task whose project is in `project_ids`
    ///
    /// # Returns
    ///
    /// Number of deleted tasks
    pub async fn delete_by_projects(pool: &PgPool, project_ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM tasks WHERE project_id = ANY($1)")
            .bind(project_ids)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
