//! Tags repository for database operations
//!
//! Assignment and release are read-then-conditionally-write transactions
//! over the visit and tag rows (`SELECT ... FOR UPDATE`, visit locked
//! first), so two concurrent assignments of the same tag serialize: the
//! first writer wins and the loser re-reads IN_USE and is rejected. Both
//! sides of the binding (`tags.current_visit_id`, `visits.tag_id`) move
//! together inside the transaction.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::TagStatus,
        tag::{CreateTag, Tag, TagStats},
        visit::Visit,
    },
};

#[derive(Clone)]
pub struct TagsRepository {
    pool: Pool<Postgres>,
}

impl TagsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get tag by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", id)))
    }

    /// Get tag by its unique tag number
    pub async fn get_by_number(&self, tag_number: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE tag_number = $1")
            .bind(tag_number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", tag_number)))
    }

    /// List tags, optionally filtered by status, active tags first
    pub async fn list(&self, status: Option<TagStatus>, active_only: bool) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT * FROM tags
            WHERE ($1::text IS NULL OR status = $1)
              AND (NOT $2 OR is_active)
            ORDER BY tag_number ASC
            "#,
        )
        .bind(status.map(|s| s.as_str().to_string()))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Create a new tag
    pub async fn create(&self, tag: &CreateTag, now: DateTime<Utc>) -> AppResult<Tag> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE tag_number = $1)")
                .bind(&tag.tag_number)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            return Err(AppError::Duplicate(format!(
                "Tag number {} already exists",
                tag.tag_number
            )));
        }

        // The exists-check above races with concurrent inserts; the unique
        // constraint is the authority, so map its violation to Duplicate too
        let created = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (tag_number, status, notes, created_at, updated_at)
            VALUES ($1, 'AVAILABLE', $2, $3, $3)
            RETURNING *
            "#,
        )
        .bind(&tag.tag_number)
        .bind(&tag.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Duplicate(
                format!("Tag number {} already exists", tag.tag_number),
            ),
            _ => AppError::from(e),
        })?;

        Ok(created)
    }

    /// Assign a tag to an open visit.
    ///
    /// Locks the visit row first, then the tag row (same order as checkout),
    /// validates both sides, and binds them: the tag goes IN_USE with the
    /// visit reference, the visit records the tag. A visit already holding a
    /// tag is rejected; release the old tag first. All-or-nothing.
    pub async fn assign(&self, tag_id: i64, visit_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
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

        if let Some(held) = visit.tag_id {
            return Err(AppError::Duplicate(format!(
                "Visit {} already holds tag {}",
                visit_id, held
            )));
        }

        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 FOR UPDATE")
            .bind(tag_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", tag_id)))?;

        Self::check_assignable(&tag)?;

        let updated = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET status = 'IN_USE',
                current_visit_id = $2,
                total_uses = total_uses + 1,
                last_used = $3,
                updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(tag_id)
        .bind(visit_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE visits SET tag_id = $2, updated_at = $3 WHERE id = $1")
            .bind(visit_id)
            .bind(tag_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Release a tag held by the given visit.
    ///
    /// Fails with `VisitMismatch` when the tag is bound to a different visit
    /// (cross-reference inconsistency) and `TagNotInUse` when it holds no
    /// visit at all.
    pub async fn release(
        &self,
        tag_id: i64,
        expected_visit_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Tag> {
        let mut tx = self.pool.begin().await?;

        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 FOR UPDATE")
            .bind(tag_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", tag_id)))?;

        if tag.status != TagStatus::InUse {
            return Err(AppError::TagNotInUse(format!(
                "Tag {} is {}, not in use",
                tag.tag_number, tag.status
            )));
        }

        if tag.current_visit_id != Some(expected_visit_id) {
            return Err(AppError::VisitMismatch(format!(
                "Tag {} is held by visit {:?}, not visit {}",
                tag.tag_number, tag.current_visit_id, expected_visit_id
            )));
        }

        let updated = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET status = 'AVAILABLE',
                current_visit_id = NULL,
                updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(tag_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        // Detach the visit only while it is still open; closed visits keep
        // their tag reference as history
        sqlx::query(
            r#"
            UPDATE visits
            SET tag_id = NULL, updated_at = $2
            WHERE id = $1 AND tag_id = $3
              AND status IN ('ACTIVE', 'PENDING', 'EXTENDED', 'OVERDUE')
            "#,
        )
        .bind(expected_visit_id)
        .bind(now)
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Administrative status change gated on the transition table.
    ///
    /// Leaving IN_USE through an out-of-band transition (lost/damaged while
    /// assigned) clears the visit reference so the IN_USE iff bound
    /// invariant holds.
    pub async fn set_status(
        &self,
        tag_id: i64,
        new_status: TagStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Tag> {
        let mut tx = self.pool.begin().await?;

        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 FOR UPDATE")
            .bind(tag_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", tag_id)))?;

        if !tag.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition(format!(
                "Tag {} cannot go from {} to {}",
                tag.tag_number, tag.status, new_status
            )));
        }

        let updated = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET status = $2,
                current_visit_id = CASE WHEN $2 = 'IN_USE' THEN current_visit_id ELSE NULL END,
                updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(tag_id)
        .bind(new_status)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        // A tag going lost/damaged while assigned leaves its visit open;
        // detach it so the visit can take a replacement tag
        if new_status != TagStatus::InUse {
            if let Some(held_by) = tag.current_visit_id {
                sqlx::query(
                    r#"
                    UPDATE visits
                    SET tag_id = NULL, updated_at = $2
                    WHERE id = $1 AND tag_id = $3
                      AND status IN ('ACTIVE', 'PENDING', 'EXTENDED', 'OVERDUE')
                    "#,
                )
                .bind(held_by)
                .bind(now)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Activate or deactivate a tag
    pub async fn set_active(&self, tag_id: i64, active: bool, now: DateTime<Utc>) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(
            "UPDATE tags SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(tag_id)
        .bind(active)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", tag_id)))
    }

    /// Per-status counts over active tags
    pub async fn stats(&self) -> AppResult<TagStats> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) as count FROM tags WHERE is_active GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = TagStats::default();
        for row in rows {
            let status: TagStatus = row.get("status");
            let count: i64 = row.get("count");
            stats.total += count;
            match status {
                TagStatus::Available => stats.available = count,
                TagStatus::InUse => stats.in_use = count,
                TagStatus::Lost => stats.lost = count,
                TagStatus::Damaged => stats.damaged = count,
                TagStatus::Maintenance => stats.maintenance = count,
                TagStatus::Reserved => stats.reserved = count,
                TagStatus::Retired => stats.retired = count,
            }
        }

        Ok(stats)
    }

    /// Validation shared with the visit-open transaction in the visits
    /// repository.
    pub(crate) fn check_assignable(tag: &Tag) -> AppResult<()> {
        if !tag.is_active {
            return Err(AppError::TagInactive(format!(
                "Tag {} is deactivated",
                tag.tag_number
            )));
        }
        if !tag.status.is_assignable() {
            return Err(AppError::TagNotAvailable(format!(
                "Tag {} is {}",
                tag.tag_number, tag.status
            )));
        }
        Ok(())
    }
}
