//! Visits repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::VisitStatus,
        tag::Tag,
        visit::{Visit, VisitDetails, VisitQuery},
    },
    repository::tags::TagsRepository,
};

const DETAILS_SELECT: &str = r#"
    SELECT v.id, v.visitor_id, vi.full_name AS visitor_name, vi.company AS visitor_company,
           v.tag_id, t.tag_number, v.host_employee,
           v.arrival_time, v.estimated_departure, v.actual_departure, v.status
    FROM visits v
    JOIN visitors vi ON v.visitor_id = vi.id
    LEFT JOIN tags t ON v.tag_id = t.id
"#;

/// Fields needed to insert a visit row (validated by the service layer)
pub struct NewVisit<'a> {
    pub visitor_id: i64,
    pub tag_id: Option<i64>,
    pub purpose: Option<&'a str>,
    pub host_employee: Option<&'a str>,
    pub arrival_time: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
    pub created_by: i64,
}

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get visit by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Visit> {
        sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", id)))
    }

    /// Open a new visit.
    ///
    /// One transaction covers the visit insert, the optional tag assignment
    /// and the visitor counter bump; a tag failure aborts the whole open.
    pub async fn open(&self, new: &NewVisit<'_>, now: DateTime<Utc>) -> AppResult<Visit> {
        let mut tx = self.pool.begin().await?;

        let visitor_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM visitors WHERE id = $1 AND is_active)",
        )
        .bind(new.visitor_id)
        .fetch_one(&mut *tx)
        .await?;

        if !visitor_exists {
            return Err(AppError::NotFound(format!(
                "Visitor with id {} not found",
                new.visitor_id
            )));
        }

        let visit = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (visitor_id, tag_id, purpose, host_employee,
                                arrival_time, estimated_departure, status,
                                created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'ACTIVE', $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(new.visitor_id)
        .bind(new.tag_id)
        .bind(new.purpose)
        .bind(new.host_employee)
        .bind(new.arrival_time)
        .bind(new.estimated_departure)
        .bind(new.created_by)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(tag_id) = new.tag_id {
            let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 FOR UPDATE")
                .bind(tag_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", tag_id)))?;

            TagsRepository::check_assignable(&tag)?;

            sqlx::query(
                r#"
                UPDATE tags
                SET status = 'IN_USE',
                    current_visit_id = $2,
                    total_uses = total_uses + 1,
                    last_used = $3,
                    updated_at = $3
                WHERE id = $1
                "#,
            )
            .bind(tag_id)
            .bind(visit.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE visitors SET total_visits = total_visits + 1, updated_at = $2 WHERE id = $1",
        )
        .bind(new.visitor_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(visit)
    }

    /// Check out a visit: COMPLETED, actual departure stamped, notes stored.
    /// Rejected once the visit is terminal, so a second checkout (or a sweep
    /// pass over an already-closed visit) is a clean no-op failure.
    pub async fn checkout(
        &self,
        visit_id: i64,
        departure_time: DateTime<Utc>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Visit> {
        let mut tx = self.pool.begin().await?;

        let visit = sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = $1 FOR UPDATE")
            .bind(visit_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", visit_id)))?;

        if !visit.status.is_open() {
            return Err(AppError::VisitNotOpen(format!(
                "Visit {} is already {}",
                visit_id, visit.status
            )));
        }

        let updated = sqlx::query_as::<_, Visit>(
            r#"
            UPDATE visits
            SET status = 'COMPLETED',
                actual_departure = $2,
                checkout_notes = $3,
                updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(visit_id)
        .bind(departure_time)
        .bind(notes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Push the estimated departure later; the visit becomes EXTENDED even
    /// when it already is.
    pub async fn extend(
        &self,
        visit_id: i64,
        new_estimated_departure: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Visit> {
        let mut tx = self.pool.begin().await?;

        let visit = sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = $1 FOR UPDATE")
            .bind(visit_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", visit_id)))?;

        if !visit.status.is_open() {
            return Err(AppError::VisitNotOpen(format!(
                "Visit {} is already {}",
                visit_id, visit.status
            )));
        }

        if new_estimated_departure <= visit.arrival_time {
            return Err(AppError::InvalidWindow(format!(
                "New departure {} is not after arrival {}",
                new_estimated_departure, visit.arrival_time
            )));
        }

        let updated = sqlx::query_as::<_, Visit>(
            r#"
            UPDATE visits
            SET status = 'EXTENDED',
                estimated_departure = $2,
                updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(visit_id)
        .bind(new_estimated_departure)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a visit. Allowed only from ACTIVE or PENDING with no departure
    /// recorded yet.
    pub async fn cancel(&self, visit_id: i64, now: DateTime<Utc>) -> AppResult<Visit> {
        let mut tx = self.pool.begin().await?;

        let visit = sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = $1 FOR UPDATE")
            .bind(visit_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", visit_id)))?;

        let cancellable = matches!(visit.status, VisitStatus::Active | VisitStatus::Pending)
            && visit.actual_departure.is_none();
        if !cancellable {
            return Err(AppError::InvalidTransition(format!(
                "Visit {} cannot be cancelled from {}",
                visit_id, visit.status
            )));
        }

        let updated = sqlx::query_as::<_, Visit>(
            r#"
            UPDATE visits
            SET status = 'CANCELLED',
                updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(visit_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Open visits whose estimated departure is at or before the cutoff
    /// (cutoff = now minus grace), oldest overdue first so the staleness
    /// bound degrades gracefully under partial failure.
    pub async fn get_overdue(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Visit>> {
        let visits = sqlx::query_as::<_, Visit>(
            r#"
            SELECT * FROM visits
            WHERE status IN ('ACTIVE', 'PENDING', 'EXTENDED', 'OVERDUE')
              AND estimated_departure < $1
            ORDER BY estimated_departure ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(visits)
    }

    /// Active visits with visitor and tag details, newest arrivals first
    pub async fn list_active(&self) -> AppResult<Vec<VisitDetails>> {
        let visits = sqlx::query_as::<_, VisitDetails>(&format!(
            r#"{DETAILS_SELECT}
            WHERE v.status IN ('ACTIVE', 'PENDING', 'EXTENDED', 'OVERDUE')
            ORDER BY v.arrival_time DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(visits)
    }

    /// Search visit history by visitor text, date range and status
    pub async fn search(&self, query: &VisitQuery) -> AppResult<Vec<VisitDetails>> {
        let visits = sqlx::query_as::<_, VisitDetails>(&format!(
            r#"{DETAILS_SELECT}
            WHERE ($1::text IS NULL OR
                   vi.full_name ILIKE '%' || $1 || '%' OR
                   vi.email ILIKE '%' || $1 || '%' OR
                   vi.company ILIKE '%' || $1 || '%')
              AND ($2::timestamptz IS NULL OR v.arrival_time >= $2)
              AND ($3::timestamptz IS NULL OR v.arrival_time <= $3)
              AND ($4::text IS NULL OR v.status = $4)
            ORDER BY v.arrival_time DESC
            LIMIT 500
            "#
        ))
        .bind(&query.search)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(&query.status)
        .fetch_all(&self.pool)
        .await?;

        Ok(visits)
    }

    /// Visits recorded for a visitor, newest first
    pub async fn list_by_visitor(&self, visitor_id: i64, limit: i64) -> AppResult<Vec<Visit>> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT * FROM visits WHERE visitor_id = $1 ORDER BY arrival_time DESC LIMIT $2",
        )
        .bind(visitor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(visits)
    }

    /// Count open visits
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visits WHERE status IN ('ACTIVE', 'PENDING', 'EXTENDED', 'OVERDUE')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count open visits past the overdue cutoff
    pub async fn count_overdue(&self, cutoff: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM visits
            WHERE status IN ('ACTIVE', 'PENDING', 'EXTENDED', 'OVERDUE')
              AND estimated_departure < $1
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count visits that arrived on the given day (UTC)
    pub async fn count_arrived_on(&self, day: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visits WHERE DATE(arrival_time) = DATE($1)",
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
