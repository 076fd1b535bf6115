//! Company settings service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::settings::{CompanySettings, UpdateCompanySettings},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self) -> AppResult<CompanySettings> {
        self.repository.settings.get().await
    }

    pub async fn update(
        &self,
        update: UpdateCompanySettings,
        modified_by: i64,
    ) -> AppResult<CompanySettings> {
        if let (Some(default_h), Some(max_h)) = (
            update.default_visit_duration_hours,
            update.max_visit_duration_hours,
        ) {
            if default_h > max_h {
                return Err(AppError::Validation(
                    "Default visit duration exceeds maximum".to_string(),
                ));
            }
        }

        self.repository
            .settings
            .update(&update, modified_by, Utc::now())
            .await
    }
}
