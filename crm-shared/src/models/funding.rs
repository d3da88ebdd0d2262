/// Funding information model and database operations
///
/// Each customer has at most one funding record in practice; lookups return
/// the oldest one. Updates keep the customer's `funding_status`,
/// `project_budget` and `decision_maker` in sync with the record.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE funding_information (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     funding_status funding_status NOT NULL,
///     project_budget DOUBLE PRECISION,
///     approval_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     decision_maker VARCHAR(100)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

pub use super::customer::FundingStatus;

/// Funding record attached to a customer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FundingInformation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub funding_status: FundingStatus,
    pub project_budget: Option<f64>,
    pub approval_date: DateTime<Utc>,
    pub decision_maker: Option<String>,
}

/// Input for creating a funding record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFunding {
    pub customer_id: Uuid,
    pub funding_status: FundingStatus,
    pub project_budget: Option<f64>,
    pub decision_maker: Option<String>,
}

/// Partial funding update; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFunding {
    pub funding_status: Option<FundingStatus>,
    pub project_budget: Option<f64>,
    pub decision_maker: Option<String>,
}

/// Outcome of [`FundingInformation::update_and_sync`]
#[derive(Debug)]
pub enum FundingUpdate {
    Updated(FundingInformation),
    NoFunding,
    NoCustomer,
}

const COLUMNS: &str =
    "id, customer_id, funding_status, project_budget, approval_date, decision_maker";

impl FundingInformation {
    pub async fn create(pool: &PgPool, data: CreateFunding) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO funding_information (customer_id, funding_status, project_budget, decision_maker)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, FundingInformation>(&query)
            .bind(data.customer_id)
            .bind(data.funding_status)
            .bind(data.project_budget)
            .bind(data.decision_maker)
            .fetch_one(pool)
            .await
    }

    /// Finds the funding record of a customer
    pub async fn find_by_customer(
        pool: &PgPool,
        customer_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM funding_information WHERE customer_id = $1 ORDER BY approval_date ASC LIMIT 1",
            COLUMNS
        );

        sqlx::query_as::<_, FundingInformation>(&query)
            .bind(customer_id)
            .fetch_optional(pool)
            .await
    }

    /// Updates the customer's funding record and mirrors it onto the customer
    ///
    /// Both writes happen in one transaction. Nothing is written if either
    /// the funding record or the customer is missing.
    pub async fn update_and_sync(
        pool: &PgPool,
        customer_id: Uuid,
        data: UpdateFunding,
    ) -> Result<FundingUpdate, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {} FROM funding_information WHERE customer_id = $1 ORDER BY approval_date ASC LIMIT 1 FOR UPDATE",
            COLUMNS
        );
        let Some(current) = sqlx::query_as::<_, FundingInformation>(&select)
            .bind(customer_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(FundingUpdate::NoFunding);
        };

        let customer_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
                .bind(customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if customer_exists.is_none() {
            return Ok(FundingUpdate::NoCustomer);
        }

        let funding_status = data.funding_status.unwrap_or(current.funding_status);
        let project_budget = data.project_budget.or(current.project_budget);
        let decision_maker = data.decision_maker.or(current.decision_maker);

        let update = format!(
            r#"
            UPDATE funding_information
            SET funding_status = $2, project_budget = $3, decision_maker = $4
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let updated = sqlx::query_as::<_, FundingInformation>(&update)
            .bind(current.id)
            .bind(funding_status)
            .bind(project_budget)
            .bind(&decision_maker)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE customers
            SET funding_status = $2, project_budget = $3, decision_maker = $4
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .bind(funding_status)
        .bind(project_budget)
        .bind(&decision_maker)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(customer_id = %customer_id, funding_id = %updated.id, "Funding synced to customer");
        Ok(FundingUpdate::Updated(updated))
    }

    /// Deletes the customer's funding record
    ///
    /// Returns `false` if the customer has none.
    pub async fn delete_by_customer(pool: &PgPool, customer_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM funding_information
            WHERE id = (
                SELECT id FROM funding_information
                WHERE customer_id = $1
                ORDER BY approval_date ASC
                LIMIT 1
            )
            "#,
        )
        .bind(customer_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts funding records still waiting on a decision
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM funding_information WHERE funding_status = 'Pending'",
        )
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
