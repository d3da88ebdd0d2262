/// Customer interaction model
///
/// # Schema
///
/// ```sql
/// CREATE TYPE interaction_type AS ENUM ('Email', 'Call', 'Meeting', 'File Upload');
///
/// CREATE TABLE customer_interactions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     interaction_type interaction_type NOT NULL,
///     interaction_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     details TEXT,
///     file_path VARCHAR(255)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interaction_type")]
pub enum InteractionType {
    Email,
    Call,
    Meeting,
    #[serde(rename = "File Upload")]
    #[sqlx(rename = "File Upload")]
    FileUpload,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub interaction_type: InteractionType,
    pub interaction_date: DateTime<Utc>,
    pub details: Option<String>,

    /// Reference to an externally stored attachment
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInteraction {
    pub customer_id: Uuid,
    pub interaction_type: InteractionType,
    pub details: Option<String>,
    pub file_path: Option<String>,
}

impl Interaction {
    pub async fn create(pool: &PgPool, data: CreateInteraction) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Interaction>(
            r#"
            INSERT INTO customer_interactions (customer_id, interaction_type, details, file_path)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, interaction_type, interaction_date, details, file_path
            "#,
        )
        .bind(data.customer_id)
        .bind(data.interaction_type)
        .bind(data.details)
        .bind(data.file_path)
        .fetch_one(pool)
        .await
    }

    /// Lists a customer's interactions, oldest first
    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Interaction>(
            r#"
            SELECT id, customer_id, interaction_type, interaction_date, details, file_path
            FROM customer_interactions
            WHERE customer_id = $1
            ORDER BY interaction_date ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customer_interactions")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
