/// Project task model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     description VARCHAR(255) NOT NULL,
///     due_date DATE NOT NULL,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     status VARCHAR(50) NOT NULL DEFAULT 'Pending'
/// );
/// ```
///
/// Status is free text; the UI uses "Pending", "In Progress" and "Done".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Status given to tasks created without one
pub const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub description: String,
    pub due_date: NaiveDate,
    pub assigned_to: Option<Uuid>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub description: String,
    pub due_date: NaiveDate,
    pub assigned_to: Option<Uuid>,

    /// Defaults to [`DEFAULT_STATUS`]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<Uuid>,
    pub status: Option<String>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
            && self.status.is_none()
    }
}

const COLUMNS: &str = "id, project_id, description, due_date, assigned_to, status";

impl Task {
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (project_id, description, due_date, assigned_to, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.project_id)
            .bind(data.description)
            .bind(data.due_date)
            .bind(data.assigned_to)
            .bind(data.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM tasks WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a project's tasks by due date
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY due_date ASC",
            COLUMNS
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE tasks SET ");
        let mut fields = builder.separated(", ");

        if let Some(description) = data.description {
            fields.push("description = ").push_bind_unseparated(description);
        }
        if let Some(due_date) = data.due_date {
            fields.push("due_date = ").push_bind_unseparated(due_date);
        }
        if let Some(assigned_to) = data.assigned_to {
            fields.push("assigned_to = ").push_bind_unseparated(assigned_to);
        }
        if let Some(status) = data.status {
            fields.push("status = ").push_bind_unseparated(status);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(COLUMNS);

        builder.build_query_as::<Task>().fetch_optional(pool).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
