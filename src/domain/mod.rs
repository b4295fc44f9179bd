//! Domain types and pure onboarding logic.
//!
//! Everything in here is deliberately free of database and HTTP concerns so
//! the stage/percentage/expiry rules can be tested in isolation.

pub mod expiry;
pub mod progress;
pub mod role;
pub mod status;

pub use expiry::{
    EXPIRY_WARNING_DAYS, days_until_expiry, effective_status, is_expired, is_expiring_soon,
};
pub use progress::{ProgressSnapshot, completion_percentage, derive_stage};
pub use role::Role;
pub use status::{DocumentStatus, Stage};
