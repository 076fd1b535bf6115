//! Dashboard statistics service

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::tag::TagStats, repository::Repository};

#[derive(Debug, Serialize, ToSchema)]
pub struct VisitStats {
    pub active: i64,
    pub overdue: i64,
    pub today: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisitorStats {
    pub active: i64,
    pub new_today: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagStatsSummary {
    pub total: i64,
    pub available: i64,
    pub in_use: i64,
    pub problematic: i64,
}

/// Front-desk dashboard snapshot
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub visits: VisitStats,
    pub visitors: VisitorStats,
    pub tags: TagStatsSummary,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn dashboard(
        &self,
        now: DateTime<Utc>,
        grace_minutes: i64,
    ) -> AppResult<DashboardStats> {
        let cutoff = now - Duration::minutes(grace_minutes);

        let tags: TagStats = self.repository.tags.stats().await?;

        Ok(DashboardStats {
            visits: VisitStats {
                active: self.repository.visits.count_active().await?,
                overdue: self.repository.visits.count_overdue(cutoff).await?,
                today: self.repository.visits.count_arrived_on(now).await?,
            },
            visitors: VisitorStats {
                active: self.repository.visitors.count_active().await?,
                new_today: self.repository.visitors.count_registered_on(now).await?,
            },
            tags: TagStatsSummary {
                total: tags.total,
                available: tags.available,
                in_use: tags.in_use,
                problematic: tags.problematic(),
            },
        })
    }
}
