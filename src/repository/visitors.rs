//! Visitors repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::VisitorCategory,
        visitor::{RegisterVisitor, Visitor, VisitorQuery},
    },
};

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get visitor by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Visitor> {
        sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visitor with id {} not found", id)))
    }

    /// Find an existing visitor by email or phone (registration dedup)
    pub async fn find_duplicate(&self, email: &str, phone: &str) -> AppResult<Option<Visitor>> {
        let visitor = sqlx::query_as::<_, Visitor>(
            "SELECT * FROM visitors WHERE email = $1 OR phone = $2 LIMIT 1",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(visitor)
    }

    /// Insert a new visitor
    pub async fn create(&self, visitor: &RegisterVisitor, now: DateTime<Utc>) -> AppResult<Visitor> {
        let category = visitor.category.unwrap_or(VisitorCategory::Guest);

        let created = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (full_name, email, phone, company, category, notes,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(&visitor.full_name)
        .bind(&visitor.email)
        .bind(&visitor.phone)
        .bind(&visitor.company)
        .bind(category)
        .bind(&visitor.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Search visitors by name/email/company and category
    pub async fn search(&self, query: &VisitorQuery) -> AppResult<Vec<Visitor>> {
        let visitors = sqlx::query_as::<_, Visitor>(
            r#"
            SELECT * FROM visitors
            WHERE is_active
              AND ($1::text IS NULL OR
                   full_name ILIKE '%' || $1 || '%' OR
                   email ILIKE '%' || $1 || '%' OR
                   company ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR category = $2)
            ORDER BY full_name ASC
            LIMIT 500
            "#,
        )
        .bind(&query.search)
        .bind(&query.category)
        .fetch_all(&self.pool)
        .await?;

        Ok(visitors)
    }

    /// Deactivate a visitor
    pub async fn set_active(&self, id: i64, active: bool, now: DateTime<Utc>) -> AppResult<Visitor> {
        sqlx::query_as::<_, Visitor>(
            "UPDATE visitors SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Visitor with id {} not found", id)))
    }

    /// Count active visitors
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visitors WHERE is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count visitors registered on the given day (UTC)
    pub async fn count_registered_on(&self, day: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM visitors WHERE DATE(created_at) = DATE($1)")
                .bind(day)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
