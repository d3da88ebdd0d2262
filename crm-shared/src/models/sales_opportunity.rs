/// Sales opportunity model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sales (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     opportunity VARCHAR(100) NOT NULL,
///     sales_stage VARCHAR(50),
///     revenue DOUBLE PRECISION,
///     owner UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesOpportunity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub opportunity: String,
    pub sales_stage: Option<String>,
    pub revenue: Option<f64>,

    /// User who owns the deal
    pub owner: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSalesOpportunity {
    pub customer_id: Uuid,
    pub opportunity: String,
    pub sales_stage: Option<String>,
    pub revenue: Option<f64>,
    pub owner: Option<Uuid>,
}

/// Partial update; only `Some` fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSalesOpportunity {
    pub customer_id: Option<Uuid>,
    pub opportunity: Option<String>,
    pub sales_stage: Option<String>,
    pub revenue: Option<f64>,
    pub owner: Option<Uuid>,
}

impl UpdateSalesOpportunity {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.opportunity.is_none()
            && self.sales_stage.is_none()
            && self.revenue.is_none()
            && self.owner.is_none()
    }
}

/// Deal count and total revenue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesSummary {
    pub total_sales_opportunities: i64,
    pub total_revenue: f64,
}

const COLUMNS: &str = "id, customer_id, opportunity, sales_stage, revenue, owner, created_at";

impl SalesOpportunity {
    pub async fn create(pool: &PgPool, data: CreateSalesOpportunity) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO sales (customer_id, opportunity, sales_stage, revenue, owner)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, SalesOpportunity>(&query)
            .bind(data.customer_id)
            .bind(data.opportunity)
            .bind(data.sales_stage)
            .bind(data.revenue)
            .bind(data.owner)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM sales WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, SalesOpportunity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM sales ORDER BY created_at DESC", COLUMNS);

        sqlx::query_as::<_, SalesOpportunity>(&query).fetch_all(pool).await
    }

    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM sales WHERE customer_id = $1 ORDER BY created_at DESC",
            COLUMNS
        );

        sqlx::query_as::<_, SalesOpportunity>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Applies a partial update, `None` if the opportunity doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateSalesOpportunity,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE sales SET ");
        let mut fields = builder.separated(", ");

        if let Some(customer_id) = data.customer_id {
            fields.push("customer_id = ").push_bind_unseparated(customer_id);
        }
        if let Some(opportunity) = data.opportunity {
            fields.push("opportunity = ").push_bind_unseparated(opportunity);
        }
        if let Some(sales_stage) = data.sales_stage {
            fields.push("sales_stage = ").push_bind_unseparated(sales_stage);
        }
        if let Some(revenue) = data.revenue {
            fields.push("revenue = ").push_bind_unseparated(revenue);
        }
        if let Some(owner) = data.owner {
            fields.push("owner = ").push_bind_unseparated(owner);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(COLUMNS);

        builder
            .build_query_as::<SalesOpportunity>()
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deal count and revenue sum; missing revenue counts as zero
    pub async fn summary(pool: &PgPool) -> Result<SalesSummary, sqlx::Error> {
        sqlx::query_as::<_, SalesSummary>(
            r#"
            SELECT COUNT(*) AS total_sales_opportunities,
                   COALESCE(SUM(revenue), 0)::DOUBLE PRECISION AS total_revenue
            FROM sales
            "#,
        )
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateSalesOpportunity::default().is_empty());

        let update: UpdateSalesOpportunity =
            serde_json::from_str(r#"{"sales_stage": "Closed Won"}"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.sales_stage.as_deref(), Some("Closed Won"));
        assert!(update.revenue.is_none());
    }
}
