//! Tag assignment and administration service

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{
        enums::TagStatus,
        tag::{CreateTag, Tag, TagStats},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TagsService {
    repository: Repository,
}

impl TagsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a tag by ID
    pub async fn get(&self, tag_id: i64) -> AppResult<Tag> {
        self.repository.tags.get_by_id(tag_id).await
    }

    /// List tags, optionally by status
    pub async fn list(&self, status: Option<TagStatus>, active_only: bool) -> AppResult<Vec<Tag>> {
        self.repository.tags.list(status, active_only).await
    }

    /// Register a new physical tag
    pub async fn create(&self, tag: CreateTag, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.create(&tag, now).await
    }

    /// Assign a tag to an existing open visit. The repository transaction
    /// validates the visit (open, not already holding a tag) under lock.
    pub async fn assign(&self, tag_id: i64, visit_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.assign(tag_id, visit_id, now).await
    }

    /// Release a tag held by the given visit
    pub async fn release(
        &self,
        tag_id: i64,
        expected_visit_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Tag> {
        self.repository.tags.release(tag_id, expected_visit_id, now).await
    }

    // Administrative status changes, all gated on the transition table.

    pub async fn mark_lost(&self, tag_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, TagStatus::Lost, now).await
    }

    pub async fn mark_damaged(&self, tag_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, TagStatus::Damaged, now).await
    }

    pub async fn mark_maintenance(&self, tag_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, TagStatus::Maintenance, now).await
    }

    pub async fn reserve(&self, tag_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, TagStatus::Reserved, now).await
    }

    pub async fn retire(&self, tag_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, TagStatus::Retired, now).await
    }

    /// Reactivate a problematic or retired tag back to AVAILABLE
    pub async fn reactivate(&self, tag_id: i64, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, TagStatus::Available, now).await
    }

    /// Generic administrative transition used by the status endpoint
    pub async fn set_status(
        &self,
        tag_id: i64,
        status: TagStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Tag> {
        self.repository.tags.set_status(tag_id, status, now).await
    }

    /// Activate or deactivate a tag
    pub async fn set_active(&self, tag_id: i64, active: bool, now: DateTime<Utc>) -> AppResult<Tag> {
        self.repository.tags.set_active(tag_id, active, now).await
    }

    /// Per-status counts
    pub async fn stats(&self) -> AppResult<TagStats> {
        self.repository.tags.stats().await
    }
}
