//! Company settings repository (singleton row)

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::settings::{CompanySettings, UpdateCompanySettings},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Postgres>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the settings row (seeded by migration, always id 1)
    pub async fn get(&self) -> AppResult<CompanySettings> {
        sqlx::query_as::<_, CompanySettings>("SELECT * FROM company_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Internal("Company settings row missing".to_string()))
    }

    /// Partial update of the settings row
    pub async fn update(
        &self,
        update: &UpdateCompanySettings,
        modified_by: i64,
        now: DateTime<Utc>,
    ) -> AppResult<CompanySettings> {
        let settings = sqlx::query_as::<_, CompanySettings>(
            r#"
            UPDATE company_settings
            SET company_name = COALESCE($1, company_name),
                welcome_message = COALESCE($2, welcome_message),
                contact_email = COALESCE($3, contact_email),
                contact_phone = COALESCE($4, contact_phone),
                default_visit_duration_hours = COALESCE($5, default_visit_duration_hours),
                max_visit_duration_hours = COALESCE($6, max_visit_duration_hours),
                require_host_employee = COALESCE($7, require_host_employee),
                departure_reminder_minutes = COALESCE($8, departure_reminder_minutes),
                auto_checkout_enabled = COALESCE($9, auto_checkout_enabled),
                auto_checkout_grace_minutes = COALESCE($10, auto_checkout_grace_minutes),
                overdue_check_interval_minutes = COALESCE($11, overdue_check_interval_minutes),
                data_retention_days = COALESCE($12, data_retention_days),
                updated_at = $13,
                last_modified_by = $14
            WHERE id = 1
            RETURNING *
            "#,
        )
        .bind(&update.company_name)
        .bind(&update.welcome_message)
        .bind(&update.contact_email)
        .bind(&update.contact_phone)
        .bind(update.default_visit_duration_hours)
        .bind(update.max_visit_duration_hours)
        .bind(update.require_host_employee)
        .bind(update.departure_reminder_minutes)
        .bind(update.auto_checkout_enabled)
        .bind(update.auto_checkout_grace_minutes)
        .bind(update.overdue_check_interval_minutes)
        .bind(update.data_retention_days)
        .bind(now)
        .bind(modified_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
