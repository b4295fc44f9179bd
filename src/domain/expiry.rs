//! Document expiry classification.
//!
//! Runs on every document save. A document with no expiry date never
//! expires. `is_expiring_soon` intentionally also covers already-expired
//! dates; `effective_status` checks `expired` first so the overlap cannot
//! produce a wrong status.

use chrono::NaiveDate;

use super::status::DocumentStatus;

/// Documents expiring within this many days count as "expiring soon".
pub const EXPIRY_WARNING_DAYS: i64 = 30;

#[must_use]
pub fn is_expired(expiry_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    expiry_date.is_some_and(|d| d < today)
}

#[must_use]
pub fn is_expiring_soon(expiry_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    expiry_date.is_some_and(|d| d <= today + chrono::Days::new(EXPIRY_WARNING_DAYS as u64))
}

/// Days until expiry, negative once past. `None` for non-expiring documents.
#[must_use]
pub fn days_until_expiry(expiry_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    expiry_date.map(|d| (d - today).num_days())
}

/// Status a document must carry after a save.
///
/// Expired documents are forced to `expired` regardless of their current
/// status. Approved documents inside the warning window become
/// `expiring_soon`. `pending` and `rejected` are never auto-overwritten.
#[must_use]
pub fn effective_status(
    current: DocumentStatus,
    expiry_date: Option<NaiveDate>,
    today: NaiveDate,
) -> DocumentStatus {
    if is_expired(expiry_date, today) {
        DocumentStatus::Expired
    } else if is_expiring_soon(expiry_date, today) && current == DocumentStatus::Approved {
        DocumentStatus::ExpiringSoon
    } else {
        current
    }
}
