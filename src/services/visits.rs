//! Visit lifecycle service

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::visit::{OpenVisit, Visit, VisitDetails, VisitQuery},
    repository::{visits::NewVisit, Repository},
};

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
}

impl VisitsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a visit by ID
    pub async fn get(&self, visit_id: i64) -> AppResult<Visit> {
        self.repository.visits.get_by_id(visit_id).await
    }

    /// Open a visit, optionally assigning a tag.
    ///
    /// The visit is not created if the tag assignment fails; visit insert,
    /// tag assignment and visitor counter bump commit together.
    pub async fn open(
        &self,
        request: &OpenVisit,
        created_by: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Visit> {
        let arrival = request.arrival_time.unwrap_or(now);

        if request.estimated_departure <= arrival {
            return Err(AppError::InvalidWindow(format!(
                "Estimated departure {} is not after arrival {}",
                request.estimated_departure, arrival
            )));
        }

        let new = NewVisit {
            visitor_id: request.visitor_id,
            tag_id: request.tag_id,
            purpose: request.purpose.as_deref(),
            host_employee: request.host_employee.as_deref(),
            arrival_time: arrival,
            estimated_departure: request.estimated_departure,
            created_by,
        };

        self.repository.visits.open(&new, now).await
    }

    /// Push the estimated departure later; the visit becomes EXTENDED
    pub async fn extend(
        &self,
        visit_id: i64,
        new_estimated_departure: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Visit> {
        self.repository
            .visits
            .extend(visit_id, new_estimated_departure, now)
            .await
    }

    /// Check out a visit and release its tag.
    ///
    /// The checkout commits first; a tag-release failure is a recorded
    /// inconsistency, not a rollback. The stale tag reference is logged for
    /// manual reconciliation.
    pub async fn checkout(
        &self,
        visit_id: i64,
        departure_time: DateTime<Utc>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Visit> {
        let visit = self
            .repository
            .visits
            .checkout(visit_id, departure_time, notes, now)
            .await?;

        if let Some(tag_id) = visit.tag_id {
            if let Err(e) = self.repository.tags.release(tag_id, visit_id, now).await {
                tracing::warn!(
                    visit_id,
                    tag_id,
                    error = %e,
                    "tag release failed after checkout; tag left for manual reconciliation"
                );
            }
        }

        Ok(visit)
    }

    /// Cancel a visit before checkout, releasing its tag
    pub async fn cancel(&self, visit_id: i64, now: DateTime<Utc>) -> AppResult<Visit> {
        let visit = self.repository.visits.cancel(visit_id, now).await?;

        if let Some(tag_id) = visit.tag_id {
            if let Err(e) = self.repository.tags.release(tag_id, visit_id, now).await {
                tracing::warn!(
                    visit_id,
                    tag_id,
                    error = %e,
                    "tag release failed after cancellation; tag left for manual reconciliation"
                );
            }
        }

        Ok(visit)
    }

    /// Active visits for the front-desk board
    pub async fn list_active(&self) -> AppResult<Vec<VisitDetails>> {
        self.repository.visits.list_active().await
    }

    /// Visit history search
    pub async fn search(&self, query: &VisitQuery) -> AppResult<Vec<VisitDetails>> {
        self.repository.visits.search(query).await
    }

    /// Visits for one visitor
    pub async fn list_by_visitor(&self, visitor_id: i64) -> AppResult<Vec<Visit>> {
        // Verify visitor exists
        self.repository.visitors.get_by_id(visitor_id).await?;
        self.repository.visits.list_by_visitor(visitor_id, 50).await
    }
}
