//! Shared domain enums and status-transition tables
//!
//! Statuses are stored as TEXT in Postgres. Transition validity is a pure
//! lookup: unknown pairs are denied, nothing here touches the database.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// TagStatus
// ---------------------------------------------------------------------------

/// Status of a physical visitor tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagStatus {
    Available,
    InUse,
    Lost,
    Damaged,
    Maintenance,
    Reserved,
    Retired,
}

impl TagStatus {
    pub const ALL: [TagStatus; 7] = [
        TagStatus::Available,
        TagStatus::InUse,
        TagStatus::Lost,
        TagStatus::Damaged,
        TagStatus::Maintenance,
        TagStatus::Reserved,
        TagStatus::Retired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagStatus::Available => "AVAILABLE",
            TagStatus::InUse => "IN_USE",
            TagStatus::Lost => "LOST",
            TagStatus::Damaged => "DAMAGED",
            TagStatus::Maintenance => "MAINTENANCE",
            TagStatus::Reserved => "RESERVED",
            TagStatus::Retired => "RETIRED",
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            TagStatus::Available => "Available",
            TagStatus::InUse => "In Use",
            TagStatus::Lost => "Lost",
            TagStatus::Damaged => "Damaged",
            TagStatus::Maintenance => "Maintenance",
            TagStatus::Reserved => "Reserved",
            TagStatus::Retired => "Retired",
        }
    }

    /// Display color (hex) for dashboards
    pub fn color(&self) -> &'static str {
        match self {
            TagStatus::Available => "#4CAF50",
            TagStatus::InUse => "#2196F3",
            TagStatus::Lost => "#F44336",
            TagStatus::Damaged => "#FF9800",
            TagStatus::Maintenance => "#9C27B0",
            TagStatus::Reserved => "#00BCD4",
            TagStatus::Retired => "#9E9E9E",
        }
    }

    /// Whether a tag in this status may be assigned to a visit.
    /// RESERVED behaves as assignable; there is no reservation-to-visitor
    /// binding check (product decision pending).
    pub fn is_assignable(&self) -> bool {
        matches!(self, TagStatus::Available | TagStatus::Reserved)
    }

    /// Whether this status needs attention from staff
    pub fn is_problematic(&self) -> bool {
        matches!(
            self,
            TagStatus::Lost | TagStatus::Damaged | TagStatus::Maintenance | TagStatus::Retired
        )
    }

    /// Valid outgoing transitions from this status.
    /// RETIRED is terminal except for explicit reactivation back to AVAILABLE.
    pub fn valid_transitions(&self) -> &'static [TagStatus] {
        match self {
            TagStatus::Available => &[
                TagStatus::InUse,
                TagStatus::Reserved,
                TagStatus::Lost,
                TagStatus::Damaged,
                TagStatus::Retired,
            ],
            TagStatus::InUse => &[TagStatus::Available, TagStatus::Lost, TagStatus::Damaged],
            TagStatus::Lost => &[TagStatus::Available, TagStatus::Retired],
            TagStatus::Damaged => &[TagStatus::Maintenance, TagStatus::Retired],
            TagStatus::Maintenance => &[
                TagStatus::Available,
                TagStatus::Damaged,
                TagStatus::Retired,
            ],
            TagStatus::Reserved => &[TagStatus::InUse, TagStatus::Available, TagStatus::Lost],
            TagStatus::Retired => &[TagStatus::Available],
        }
    }

    /// Pure transition check; unknown pairs are denied
    pub fn can_transition_to(&self, to: TagStatus) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl std::fmt::Display for TagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for TagStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(TagStatus::Available),
            "IN_USE" | "IN USE" | "ASSIGNED" => Ok(TagStatus::InUse),
            "LOST" => Ok(TagStatus::Lost),
            "DAMAGED" => Ok(TagStatus::Damaged),
            "MAINTENANCE" => Ok(TagStatus::Maintenance),
            "RESERVED" => Ok(TagStatus::Reserved),
            "RETIRED" => Ok(TagStatus::Retired),
            other => Err(format!("Invalid tag status: {}", other)),
        }
    }
}

impl sqlx::Type<Postgres> for TagStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for TagStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for TagStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// VisitStatus
// ---------------------------------------------------------------------------

/// Status of a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Active,
    Completed,
    Overdue,
    Cancelled,
    Pending,
    Extended,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Active => "ACTIVE",
            VisitStatus::Completed => "COMPLETED",
            VisitStatus::Overdue => "OVERDUE",
            VisitStatus::Cancelled => "CANCELLED",
            VisitStatus::Pending => "PENDING",
            VisitStatus::Extended => "EXTENDED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisitStatus::Active => "Active",
            VisitStatus::Completed => "Completed",
            VisitStatus::Overdue => "Overdue",
            VisitStatus::Cancelled => "Cancelled",
            VisitStatus::Pending => "Pending",
            VisitStatus::Extended => "Extended",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            VisitStatus::Active => "#4CAF50",
            VisitStatus::Completed => "#2196F3",
            VisitStatus::Overdue => "#F44336",
            VisitStatus::Cancelled => "#9E9E9E",
            VisitStatus::Pending => "#FFC107",
            VisitStatus::Extended => "#00BCD4",
        }
    }

    /// A visit is open while the visitor is still on premises
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            VisitStatus::Active | VisitStatus::Pending | VisitStatus::Extended | VisitStatus::Overdue
        )
    }

    /// COMPLETED and CANCELLED accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, VisitStatus::Completed | VisitStatus::Cancelled)
    }

    /// Valid outgoing transitions: open statuses are mutually reachable
    /// and each may close to COMPLETED or CANCELLED.
    pub fn valid_transitions(&self) -> &'static [VisitStatus] {
        match self {
            VisitStatus::Active
            | VisitStatus::Pending
            | VisitStatus::Extended
            | VisitStatus::Overdue => &[
                VisitStatus::Active,
                VisitStatus::Pending,
                VisitStatus::Extended,
                VisitStatus::Overdue,
                VisitStatus::Completed,
                VisitStatus::Cancelled,
            ],
            VisitStatus::Completed | VisitStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, to: VisitStatus) -> bool {
        // Self-transitions on open visits are allowed (EXTENDED -> EXTENDED)
        self.valid_transitions().contains(&to) && !(self == &to && self.is_terminal())
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VisitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(VisitStatus::Active),
            "COMPLETED" => Ok(VisitStatus::Completed),
            "OVERDUE" => Ok(VisitStatus::Overdue),
            "CANCELLED" => Ok(VisitStatus::Cancelled),
            "PENDING" => Ok(VisitStatus::Pending),
            "EXTENDED" => Ok(VisitStatus::Extended),
            other => Err(format!("Invalid visit status: {}", other)),
        }
    }
}

impl sqlx::Type<Postgres> for VisitStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for VisitStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for VisitStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// VisitorCategory
// ---------------------------------------------------------------------------

/// Category of a registered visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorCategory {
    Guest,
    Supplier,
    Contractor,
}

impl VisitorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorCategory::Guest => "GUEST",
            VisitorCategory::Supplier => "SUPPLIER",
            VisitorCategory::Contractor => "CONTRACTOR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisitorCategory::Guest => "Guest",
            VisitorCategory::Supplier => "Supplier",
            VisitorCategory::Contractor => "Contractor",
        }
    }
}

impl std::fmt::Display for VisitorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VisitorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GUEST" => Ok(VisitorCategory::Guest),
            "SUPPLIER" => Ok(VisitorCategory::Supplier),
            "CONTRACTOR" => Ok(VisitorCategory::Contractor),
            other => Err(format!("Invalid visitor category: {}", other)),
        }
    }
}

impl sqlx::Type<Postgres> for VisitorCategory {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for VisitorCategory {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for VisitorCategory {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role of a staff user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Receptionist,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Receptionist => "RECEPTIONIST",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Receptionist => "Receptionist",
        }
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserRole::Admin => &["ALL"],
            UserRole::Receptionist => &[
                "REGISTER_VISITOR",
                "VIEW_VISITORS",
                "CHECKOUT_VISITOR",
                "VIEW_REPORTS",
            ],
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "RECEPTIONIST" => Ok(UserRole::Receptionist),
            other => Err(format!("Invalid user role: {}", other)),
        }
    }
}

impl sqlx::Type<Postgres> for UserRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for UserRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for UserRole {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_available_transitions() {
        let from = TagStatus::Available;
        assert!(from.can_transition_to(TagStatus::InUse));
        assert!(from.can_transition_to(TagStatus::Reserved));
        assert!(from.can_transition_to(TagStatus::Lost));
        assert!(from.can_transition_to(TagStatus::Damaged));
        assert!(from.can_transition_to(TagStatus::Retired));
        assert!(!from.can_transition_to(TagStatus::Maintenance));
    }

    #[test]
    fn tag_in_use_cannot_be_reserved_or_retired() {
        let from = TagStatus::InUse;
        assert!(from.can_transition_to(TagStatus::Available));
        assert!(from.can_transition_to(TagStatus::Lost));
        assert!(from.can_transition_to(TagStatus::Damaged));
        assert!(!from.can_transition_to(TagStatus::Reserved));
        assert!(!from.can_transition_to(TagStatus::Retired));
        assert!(!from.can_transition_to(TagStatus::InUse));
    }

    #[test]
    fn tag_retired_only_reactivates() {
        for to in TagStatus::ALL {
            assert_eq!(
                TagStatus::Retired.can_transition_to(to),
                to == TagStatus::Available
            );
        }
    }

    #[test]
    fn tag_assignable_statuses() {
        assert!(TagStatus::Available.is_assignable());
        assert!(TagStatus::Reserved.is_assignable());
        assert!(!TagStatus::InUse.is_assignable());
        assert!(!TagStatus::Lost.is_assignable());
        assert!(!TagStatus::Damaged.is_assignable());
        assert!(!TagStatus::Maintenance.is_assignable());
        assert!(!TagStatus::Retired.is_assignable());
    }

    #[test]
    fn visit_open_statuses_mutually_reachable() {
        let open = [
            VisitStatus::Active,
            VisitStatus::Pending,
            VisitStatus::Extended,
            VisitStatus::Overdue,
        ];
        for from in open {
            for to in open {
                assert!(from.can_transition_to(to), "{} -> {}", from, to);
            }
            assert!(from.can_transition_to(VisitStatus::Completed));
            assert!(from.can_transition_to(VisitStatus::Cancelled));
        }
    }

    #[test]
    fn visit_terminal_statuses_reject_everything() {
        let all = [
            VisitStatus::Active,
            VisitStatus::Completed,
            VisitStatus::Overdue,
            VisitStatus::Cancelled,
            VisitStatus::Pending,
            VisitStatus::Extended,
        ];
        for terminal in [VisitStatus::Completed, VisitStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(!terminal.is_open());
            for to in all {
                assert!(!terminal.can_transition_to(to), "{} -> {}", terminal, to);
            }
        }
    }

    #[test]
    fn status_roundtrip_from_str() {
        assert_eq!("IN USE".parse::<TagStatus>().unwrap(), TagStatus::InUse);
        assert_eq!("assigned".parse::<TagStatus>().unwrap(), TagStatus::InUse);
        assert_eq!("extended".parse::<VisitStatus>().unwrap(), VisitStatus::Extended);
        assert!("BROKEN".parse::<TagStatus>().is_err());
        for status in TagStatus::ALL {
            assert_eq!(status.as_str().parse::<TagStatus>().unwrap(), status);
        }
    }
}
