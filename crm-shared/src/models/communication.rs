/// Communication record model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE communication_records (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     contact_type VARCHAR(50),
///     details TEXT,
///     contact_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunicationRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub contact_type: Option<String>,
    pub details: Option<String>,
    pub contact_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunication {
    pub customer_id: Uuid,
    pub contact_type: String,
    pub details: String,
}

impl CommunicationRecord {
    pub async fn create(pool: &PgPool, data: CreateCommunication) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CommunicationRecord>(
            r#"
            INSERT INTO communication_records (customer_id, contact_type, details)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, contact_type, details, contact_date
            "#,
        )
        .bind(data.customer_id)
        .bind(data.contact_type)
        .bind(data.details)
        .fetch_one(pool)
        .await
    }

    /// Lists all records, most recent contact first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CommunicationRecord>(
            r#"
            SELECT id, customer_id, contact_type, details, contact_date
            FROM communication_records
            ORDER BY contact_date DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM communication_records WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
