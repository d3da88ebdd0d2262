/// Customer model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE funding_status AS ENUM ('Funded', 'Approved', 'Pending', 'Rejected');
///
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(50),
///     company VARCHAR(255),
///     industry VARCHAR(255),
///     sales_stage VARCHAR(50),
///     address VARCHAR(255),
///     location VARCHAR(255),
///     tags VARCHAR(255),
///     funding_status funding_status,
///     project_budget DOUBLE PRECISION,
///     decision_maker VARCHAR(100),
///     technical_evaluator VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Deleting a customer cascades to its funding records, interactions, sales
/// opportunities, communication records and projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Funding state shared by customers and funding records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "funding_status")]
pub enum FundingStatus {
    Funded,
    Approved,
    Pending,
    Rejected,
}

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,

    /// Free-form pipeline stage, e.g. "New Lead", "Negotiation", "Lost"
    pub sales_stage: Option<String>,

    pub address: Option<String>,
    pub location: Option<String>,

    /// Comma-separated labels
    pub tags: Option<String>,

    /// Mirrored from the customer's funding record
    pub funding_status: Option<FundingStatus>,
    pub project_budget: Option<f64>,
    pub decision_maker: Option<String>,
    pub technical_evaluator: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub sales_stage: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tags: Option<String>,
}

/// Partial customer update
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub sales_stage: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub tags: Option<String>,
    pub decision_maker: Option<String>,
    pub technical_evaluator: Option<String>,
}

impl UpdateCustomer {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.industry.is_none()
            && self.sales_stage.is_none()
            && self.address.is_none()
            && self.location.is_none()
            && self.tags.is_none()
            && self.decision_maker.is_none()
            && self.technical_evaluator.is_none()
    }
}

const COLUMNS: &str = "id, name, email, phone, company, industry, sales_stage, address, location, \
     tags, funding_status, project_budget, decision_maker, technical_evaluator, created_at";

impl Customer {
    pub async fn create(pool: &PgPool, data: CreateCustomer) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO customers (name, email, phone, company, industry, sales_stage, address, location, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Customer>(&query)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.company)
            .bind(data.industry)
            .bind(data.sales_stage)
            .bind(data.address)
            .bind(data.location)
            .bind(data.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM customers WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all customers, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM customers ORDER BY created_at DESC", COLUMNS);

        sqlx::query_as::<_, Customer>(&query).fetch_all(pool).await
    }

    /// Applies a partial update
    ///
    /// Returns `None` if the customer doesn't exist. An empty update just
    /// re-reads the row.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE customers SET ");
        let mut fields = builder.separated(", ");

        if let Some(name) = data.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(email) = data.email {
            fields.push("email = ").push_bind_unseparated(email);
        }
        if let Some(phone) = data.phone {
            fields.push("phone = ").push_bind_unseparated(phone);
        }
        if let Some(company) = data.company {
            fields.push("company = ").push_bind_unseparated(company);
        }
        if let Some(industry) = data.industry {
            fields.push("industry = ").push_bind_unseparated(industry);
        }
        if let Some(sales_stage) = data.sales_stage {
            fields.push("sales_stage = ").push_bind_unseparated(sales_stage);
        }
        if let Some(address) = data.address {
            fields.push("address = ").push_bind_unseparated(address);
        }
        if let Some(location) = data.location {
            fields.push("location = ").push_bind_unseparated(location);
        }
        if let Some(tags) = data.tags {
            fields.push("tags = ").push_bind_unseparated(tags);
        }
        if let Some(decision_maker) = data.decision_maker {
            fields.push("decision_maker = ").push_bind_unseparated(decision_maker);
        }
        if let Some(technical_evaluator) = data.technical_evaluator {
            fields
                .push("technical_evaluator = ")
                .push_bind_unseparated(technical_evaluator);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(COLUMNS);

        builder
            .build_query_as::<Customer>()
            .fetch_optional(pool)
            .await
    }

    /// Deletes a customer and, by cascade, everything hanging off it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts customers whose stage isn't "Lost"
    ///
    /// Customers with no stage yet count as active.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM customers WHERE sales_stage IS DISTINCT FROM 'Lost'",
        )
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Customer count per industry, largest first
    pub async fn count_by_industry(
        pool: &PgPool,
    ) -> Result<Vec<(Option<String>, i64)>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT industry, COUNT(*)
            FROM customers
            GROUP BY industry
            ORDER BY COUNT(*) DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
