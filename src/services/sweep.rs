//! Overdue auto-checkout sweep
//!
//! Stateless batch pass: select all open visits past estimated departure
//! plus grace, oldest first, and check each out independently. A failed
//! visit is reported and skipped, never aborts the batch. Re-running the
//! sweep is idempotent because completed visits fall out of the selection
//! predicate.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult, models::visit::Visit, repository::Repository,
    services::visits::VisitsService,
};

/// Notes stored on auto-checked-out visits
pub const AUTO_CHECKOUT_NOTES: &str = "Auto-checkout: Overdue";

/// Fire-and-forget notification hook invoked once per auto-checked-out
/// visit. Failures stay inside the implementation; they do not feed back
/// into the sweep's accounting.
#[cfg_attr(test, mockall::automock)]
pub trait AutoCheckoutNotifier: Send + Sync {
    fn auto_checkout(&self, visit_id: i64, checkout_time: DateTime<Utc>);
}

/// Default notifier: structured log line per auto-checkout
pub struct TracingNotifier;

impl AutoCheckoutNotifier for TracingNotifier {
    fn auto_checkout(&self, visit_id: i64, checkout_time: DateTime<Utc>) {
        tracing::info!(visit_id, %checkout_time, "visit auto-checked out");
    }
}

/// Persistence operations the sweep drives. The production implementation
/// wraps the repository and the visit service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SweepStore: Send + Sync {
    /// Open visits whose estimated departure is before the cutoff,
    /// oldest first
    async fn overdue_visits(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Visit>>;

    /// Check out one visit with the auto-checkout notes
    async fn auto_checkout(&self, visit_id: i64, at: DateTime<Utc>) -> AppResult<()>;
}

struct RepositorySweepStore {
    repository: Repository,
    visits: VisitsService,
}

#[async_trait]
impl SweepStore for RepositorySweepStore {
    async fn overdue_visits(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Visit>> {
        self.repository.visits.get_overdue(cutoff).await
    }

    async fn auto_checkout(&self, visit_id: i64, at: DateTime<Utc>) -> AppResult<()> {
        self.visits
            .checkout(visit_id, at, Some(AUTO_CHECKOUT_NOTES), at)
            .await
            .map(|_| ())
    }
}

/// One failed visit within a sweep pass
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SweepFailure {
    pub visit_id: i64,
    pub reason: String,
}

/// Outcome of one sweep pass
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SweepReport {
    /// Visits checked out by this pass, oldest overdue first
    pub checked_out: Vec<i64>,
    pub failures: Vec<SweepFailure>,
}

#[derive(Clone)]
pub struct SweepService {
    store: Arc<dyn SweepStore>,
    notifier: Arc<dyn AutoCheckoutNotifier>,
}

impl SweepService {
    pub fn new(
        repository: Repository,
        visits: VisitsService,
        notifier: Arc<dyn AutoCheckoutNotifier>,
    ) -> Self {
        Self {
            store: Arc::new(RepositorySweepStore { repository, visits }),
            notifier,
        }
    }

    /// Run one sweep pass at time `now` with the given grace period.
    pub async fn run(&self, now: DateTime<Utc>, grace_minutes: i64) -> AppResult<SweepReport> {
        let cutoff = now - Duration::minutes(grace_minutes);
        let overdue = self.store.overdue_visits(cutoff).await?;

        tracing::debug!(count = overdue.len(), %cutoff, "overdue sweep selected visits");

        let mut report = SweepReport::default();
        for visit in overdue {
            match self.store.auto_checkout(visit.id, now).await {
                Ok(()) => {
                    report.checked_out.push(visit.id);
                    self.notifier.auto_checkout(visit.id, now);
                }
                Err(e) => {
                    // Per-visit containment: log, record, continue the batch
                    tracing::warn!(visit_id = visit.id, error = %e, "overdue sweep checkout failed");
                    report.failures.push(SweepFailure {
                        visit_id: visit.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !report.checked_out.is_empty() || !report.failures.is_empty() {
            tracing::info!(
                checked_out = report.checked_out.len(),
                failures = report.failures.len(),
                "overdue sweep completed"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::enums::VisitStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn overdue_visit(id: i64) -> Visit {
        let estimated = now() - Duration::minutes(30);
        Visit {
            id,
            visitor_id: 1,
            tag_id: None,
            purpose: None,
            host_employee: None,
            arrival_time: estimated - Duration::hours(1),
            estimated_departure: estimated,
            actual_departure: None,
            status: VisitStatus::Active,
            checkout_notes: None,
            created_by: 1,
            created_at: estimated - Duration::hours(1),
            updated_at: estimated - Duration::hours(1),
        }
    }

    fn service(store: MockSweepStore, notifier: MockAutoCheckoutNotifier) -> SweepService {
        SweepService {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
        }
    }

    #[tokio::test]
    async fn selection_cutoff_is_now_minus_grace() {
        let expected = now() - Duration::minutes(15);
        let mut store = MockSweepStore::new();
        store
            .expect_overdue_visits()
            .withf(move |cutoff| *cutoff == expected)
            .return_once(|_| Ok(vec![]));
        let notifier = MockAutoCheckoutNotifier::new();

        let report = service(store, notifier).run(now(), 15).await.unwrap();
        assert!(report.checked_out.is_empty());
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn notifies_once_per_checked_out_visit() {
        let mut store = MockSweepStore::new();
        store
            .expect_overdue_visits()
            .return_once(|_| Ok(vec![overdue_visit(7), overdue_visit(9)]));
        store
            .expect_auto_checkout()
            .times(2)
            .withf(move |_, at| *at == now())
            .returning(|_, _| Ok(()));
        let mut notifier = MockAutoCheckoutNotifier::new();
        notifier
            .expect_auto_checkout()
            .times(2)
            .returning(|_, _| ());

        let report = service(store, notifier).run(now(), 15).await.unwrap();
        assert_eq!(report.checked_out, vec![7, 9]);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn failed_visit_is_contained_and_not_notified() {
        let mut store = MockSweepStore::new();
        store
            .expect_overdue_visits()
            .return_once(|_| Ok(vec![overdue_visit(1), overdue_visit(2), overdue_visit(3)]));
        store
            .expect_auto_checkout()
            .times(3)
            .returning(|visit_id, _| {
                if visit_id == 2 {
                    Err(AppError::VisitNotOpen(
                        "Visit 2 is already Completed".to_string(),
                    ))
                } else {
                    Ok(())
                }
            });
        let mut notifier = MockAutoCheckoutNotifier::new();
        notifier
            .expect_auto_checkout()
            .times(2)
            .withf(|visit_id, _| *visit_id != 2)
            .returning(|_, _| ());

        let report = service(store, notifier).run(now(), 15).await.unwrap();
        assert_eq!(report.checked_out, vec![1, 3]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].visit_id, 2);
        assert!(report.failures[0].reason.contains("already"));
    }

    #[tokio::test]
    async fn selection_failure_notifies_nobody() {
        let mut store = MockSweepStore::new();
        store
            .expect_overdue_visits()
            .return_once(|_| Err(AppError::Internal("connection lost".to_string())));
        store.expect_auto_checkout().never();
        let mut notifier = MockAutoCheckoutNotifier::new();
        notifier.expect_auto_checkout().never();

        let result = service(store, notifier).run(now(), 15).await;
        assert!(result.is_err());
    }
}
