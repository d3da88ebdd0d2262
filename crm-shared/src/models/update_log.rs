/// Project update log model
///
/// Logs are append-only; there is no update or delete.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE update_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     change_type VARCHAR(100) NOT NULL,
///     responsible_person VARCHAR(100) NOT NULL,
///     timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     comment TEXT
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UpdateLog {
    pub id: Uuid,
    pub project_id: Uuid,
    pub change_type: String,
    pub responsible_person: String,
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUpdateLog {
    pub project_id: Uuid,
    pub change_type: String,
    pub responsible_person: String,
    pub comment: Option<String>,
}

impl UpdateLog {
    pub async fn create(pool: &PgPool, data: CreateUpdateLog) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UpdateLog>(
            r#"
            INSERT INTO update_logs (project_id, change_type, responsible_person, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, project_id, change_type, responsible_person, timestamp, comment
            "#,
        )
        .bind(data.project_id)
        .bind(data.change_type)
        .bind(data.responsible_person)
        .bind(data.comment)
        .fetch_one(pool)
        .await
    }

    /// Lists a project's log, oldest entry first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UpdateLog>(
            r#"
            SELECT id, project_id, change_type, responsible_person, timestamp, comment
            FROM update_logs
            WHERE project_id = $1
            ORDER BY timestamp ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
