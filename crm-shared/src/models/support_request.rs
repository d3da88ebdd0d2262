/// Support request model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE support_requests (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     request_type VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL,
///     status VARCHAR(50) NOT NULL DEFAULT 'Pending',
///     requested_by VARCHAR(100) NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Status every new request starts in
pub const INITIAL_STATUS: &str = "Pending";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupportRequest {
    pub id: Uuid,
    pub project_id: Uuid,
    pub request_type: String,
    pub description: String,
    pub status: String,
    pub requested_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupportRequest {
    pub project_id: Uuid,
    pub request_type: String,
    pub description: String,
    pub requested_by: String,
}

const COLUMNS: &str = "id, project_id, request_type, description, status, requested_by";

impl SupportRequest {
    /// Files a new request in [`INITIAL_STATUS`]
    pub async fn create(pool: &PgPool, data: CreateSupportRequest) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO support_requests (project_id, request_type, description, status, requested_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, SupportRequest>(&query)
            .bind(data.project_id)
            .bind(data.request_type)
            .bind(data.description)
            .bind(INITIAL_STATUS)
            .bind(data.requested_by)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM support_requests WHERE project_id = $1",
            COLUMNS
        );

        sqlx::query_as::<_, SupportRequest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE support_requests SET status = $2 WHERE id = $1 RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, SupportRequest>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
