//! Visit model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::VisitStatus;

/// Visit model from database
///
/// A visit is either open (ACTIVE/PENDING/EXTENDED/OVERDUE, no
/// `actual_departure`) or closed (COMPLETED/CANCELLED), never both.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: i64,
    pub visitor_id: i64,
    pub tag_id: Option<i64>,
    pub purpose: Option<String>,
    pub host_employee: Option<String>,
    pub arrival_time: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub status: VisitStatus,
    pub checkout_notes: Option<String>,
    /// Staff user who registered the visit
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Visit {
    /// Derived overdue predicate: the visit is still open and `now` is past
    /// the estimated departure plus the grace period.
    pub fn is_overdue(&self, now: DateTime<Utc>, grace_minutes: i64) -> bool {
        self.status.is_open() && now > self.estimated_departure + Duration::minutes(grace_minutes)
    }
}

/// Open visit request
#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenVisit {
    pub visitor_id: i64,
    /// Optional tag to assign; the visit is not created if assignment fails
    pub tag_id: Option<i64>,
    pub purpose: Option<String>,
    pub host_employee: Option<String>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub estimated_departure: DateTime<Utc>,
}

/// Visit with visitor details for display
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct VisitDetails {
    pub id: i64,
    pub visitor_id: i64,
    pub visitor_name: String,
    pub visitor_company: Option<String>,
    pub tag_id: Option<i64>,
    pub tag_number: Option<String>,
    pub host_employee: Option<String>,
    pub arrival_time: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub status: VisitStatus,
}

/// Query parameters for visit search
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct VisitQuery {
    /// Matches visitor name, email or company
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::VisitStatus;
    use chrono::TimeZone;

    fn visit(status: VisitStatus, arrival: DateTime<Utc>, estimated: DateTime<Utc>) -> Visit {
        Visit {
            id: 1,
            visitor_id: 1,
            tag_id: None,
            purpose: None,
            host_employee: None,
            arrival_time: arrival,
            estimated_departure: estimated,
            actual_departure: None,
            status,
            checkout_notes: None,
            created_by: 1,
            created_at: arrival,
            updated_at: arrival,
        }
    }

    #[test]
    fn overdue_boundary_with_grace() {
        // Opened at T, estimated departure T+60min, grace 15min
        let t = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let v = visit(VisitStatus::Active, t, t + Duration::minutes(60));

        // 74 minutes in: not yet overdue
        assert!(!v.is_overdue(t + Duration::minutes(74), 15));
        // exactly at the boundary: still not overdue (strict >)
        assert!(!v.is_overdue(t + Duration::minutes(75), 15));
        // 76 minutes in: overdue
        assert!(v.is_overdue(t + Duration::minutes(76), 15));
    }

    #[test]
    fn closed_visits_are_never_overdue() {
        let t = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        for status in [VisitStatus::Completed, VisitStatus::Cancelled] {
            let v = visit(status, t, t + Duration::minutes(60));
            assert!(!v.is_overdue(t + Duration::hours(10), 15));
        }
    }

    #[test]
    fn extended_visits_use_new_departure() {
        let t = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let v = visit(VisitStatus::Extended, t, t + Duration::minutes(180));
        assert!(!v.is_overdue(t + Duration::minutes(120), 15));
        assert!(v.is_overdue(t + Duration::minutes(200), 15));
    }
}
