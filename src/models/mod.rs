//! Data models for Gatehouse

pub mod enums;
pub mod settings;
pub mod tag;
pub mod user;
pub mod visit;
pub mod visitor;

// Re-export commonly used types
pub use enums::{TagStatus, UserRole, VisitStatus, VisitorCategory};
pub use settings::CompanySettings;
pub use tag::{Tag, TagStats};
pub use user::{User, UserClaims, UserShort};
pub use visit::{Visit, VisitDetails};
pub use visitor::Visitor;
