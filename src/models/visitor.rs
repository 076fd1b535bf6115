//! Visitor model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::VisitorCategory;

/// Visitor model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visitor {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub category: VisitorCategory,
    pub notes: Option<String>,
    pub is_active: bool,
    /// Incremented each time a new visit is opened for this visitor
    pub total_visits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Register visitor request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterVisitor {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
    pub company: Option<String>,
    pub category: Option<VisitorCategory>,
    pub notes: Option<String>,
}

/// Query parameters for visitor search
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct VisitorQuery {
    /// Matches name, email or company
    pub search: Option<String>,
    pub category: Option<String>,
}
