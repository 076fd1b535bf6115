//! Company settings (singleton row)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Company settings record, always row id 1
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompanySettings {
    pub id: i64,
    pub company_name: String,
    pub welcome_message: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub default_visit_duration_hours: i32,
    pub max_visit_duration_hours: i32,
    pub require_host_employee: bool,
    pub departure_reminder_minutes: i32,
    pub auto_checkout_enabled: bool,
    pub auto_checkout_grace_minutes: i32,
    pub overdue_check_interval_minutes: i32,
    pub data_retention_days: i32,
    pub updated_at: DateTime<Utc>,
    pub last_modified_by: Option<i64>,
}

/// Partial update of company settings
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCompanySettings {
    pub company_name: Option<String>,
    pub welcome_message: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub default_visit_duration_hours: Option<i32>,
    pub max_visit_duration_hours: Option<i32>,
    pub require_host_employee: Option<bool>,
    pub departure_reminder_minutes: Option<i32>,
    pub auto_checkout_enabled: Option<bool>,
    pub auto_checkout_grace_minutes: Option<i32>,
    pub overdue_check_interval_minutes: Option<i32>,
    pub data_retention_days: Option<i32>,
}
