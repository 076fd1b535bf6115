//! Physical tag model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::TagStatus;

/// Tag model from database
///
/// Invariant: `current_visit_id` is set iff `status == IN_USE`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i64,
    /// Unique human-assigned tag number
    pub tag_number: String,
    pub status: TagStatus,
    /// Visit currently holding this tag, if any
    pub current_visit_id: Option<i64>,
    pub last_used: Option<DateTime<Utc>>,
    pub total_uses: i32,
    pub notes: Option<String>,
    /// A deactivated tag can never be assigned regardless of status
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create tag request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTag {
    pub tag_number: String,
    pub notes: Option<String>,
}

/// Per-status tag counts for the dashboard
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TagStats {
    pub total: i64,
    pub available: i64,
    pub in_use: i64,
    pub lost: i64,
    pub damaged: i64,
    pub maintenance: i64,
    pub reserved: i64,
    pub retired: i64,
}

impl TagStats {
    pub fn problematic(&self) -> i64 {
        self.lost + self.damaged + self.maintenance + self.retired
    }

    pub fn assignable(&self) -> i64 {
        self.available + self.reserved
    }
}
