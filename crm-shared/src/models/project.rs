/// Project model and database operations
///
/// Projects belong to a customer. Tasks, support requests and update logs
/// belong to a project and are removed with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     project_name VARCHAR(200) NOT NULL,
///     budget DOUBLE PRECISION,
///     phase VARCHAR(100),
///     manager VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub project_name: String,
    pub budget: Option<f64>,
    pub phase: Option<String>,

    /// Manager's display name
    pub manager: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub customer_id: Uuid,
    pub project_name: String,
    pub budget: Option<f64>,
    pub phase: Option<String>,
    pub manager: Option<String>,
}

/// Project count and total budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BudgetSummary {
    pub total_projects: i64,
    pub total_budget: f64,
}

const COLUMNS: &str = "id, customer_id, project_name, budget, phase, manager, created_at";

impl Project {
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO projects (customer_id, project_name, budget, phase, manager)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(data.customer_id)
            .bind(data.project_name)
            .bind(data.budget)
            .bind(data.phase)
            .bind(data.manager)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM projects WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM projects ORDER BY created_at DESC", COLUMNS);

        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM projects WHERE customer_id = $1 ORDER BY created_at DESC",
            COLUMNS
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Deletes a project along with its tasks, support requests and logs
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn budget_summary(pool: &PgPool) -> Result<BudgetSummary, sqlx::Error> {
        sqlx::query_as::<_, BudgetSummary>(
            r#"
            SELECT COUNT(*) AS total_projects,
                   COALESCE(SUM(budget), 0)::DOUBLE PRECISION AS total_budget
            FROM projects
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
