//! Visitor registration service

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::visitor::{RegisterVisitor, Visitor, VisitorQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct VisitorsService {
    repository: Repository,
}

impl VisitorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a visitor by ID
    pub async fn get(&self, visitor_id: i64) -> AppResult<Visitor> {
        self.repository.visitors.get_by_id(visitor_id).await
    }

    /// Register a visitor, deduplicated by (email, phone).
    ///
    /// Returns the existing record when either field matches a known
    /// visitor; the boolean reports whether a new row was created.
    pub async fn register(
        &self,
        request: RegisterVisitor,
        now: DateTime<Utc>,
    ) -> AppResult<(Visitor, bool)> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(existing) = self
            .repository
            .visitors
            .find_duplicate(&request.email, &request.phone)
            .await?
        {
            return Ok((existing, false));
        }

        let visitor = self.repository.visitors.create(&request, now).await?;
        Ok((visitor, true))
    }

    /// Search visitors
    pub async fn search(&self, query: &VisitorQuery) -> AppResult<Vec<Visitor>> {
        self.repository.visitors.search(query).await
    }

    /// Deactivate a visitor
    pub async fn deactivate(&self, visitor_id: i64, now: DateTime<Utc>) -> AppResult<Visitor> {
        self.repository.visitors.set_active(visitor_id, false, now).await
    }
}
