//! Stage derivation and completion percentage.
//!
//! Both functions are recomputed from scratch on every call; the stored
//! `OnboardingProgress` row is a cache of these results, never an
//! independent source of truth.

use super::status::Stage;

/// Point-in-time counts a progress recomputation runs over.
///
/// `required_*` counts only consider documents whose type is flagged
/// required; optional-type documents never affect stage or percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressSnapshot {
    /// Personal details record exists and every required field is filled.
    pub details_complete: bool,
    /// Number of required document types configured in the catalog.
    pub required_types: u64,
    /// Number of the user's documents with a required type, any status.
    pub required_docs: u64,
    pub required_pending: u64,
    pub required_rejected: u64,
    pub required_approved: u64,
}

/// Assigns the onboarding stage. Priority-ordered, first match wins:
///
/// 1. missing/incomplete personal details
/// 2. no required-type documents uploaded yet
/// 3. any required-type document awaiting review
/// 4. any required-type document rejected
/// 5. every required type approved
/// 6. fallback: required documents remain to (re)submit, e.g. after an
///    automatic expiry knocked an approved document back
#[must_use]
pub fn derive_stage(snapshot: &ProgressSnapshot) -> Stage {
    if !snapshot.details_complete {
        Stage::PersonalDetails
    } else if snapshot.required_docs == 0 {
        Stage::DocumentsUpload
    } else if snapshot.required_pending > 0 {
        Stage::AdminReview
    } else if snapshot.required_rejected > 0 {
        Stage::Rejected
    } else if snapshot.required_approved >= snapshot.required_types {
        Stage::Completed
    } else {
        Stage::DocumentsUpload
    }
}

/// Unit-weighted completion percentage in `[0, 100]`.
///
/// One unit for complete personal details, one per approved required
/// document, one for the final admin sign-off (earned once the stage is
/// `completed`). Returns 0 when no required types are configured.
#[must_use]
pub fn completion_percentage(snapshot: &ProgressSnapshot, stage: Stage) -> i32 {
    if snapshot.required_types == 0 {
        return 0;
    }

    let total_units = snapshot.required_types + 2;
    let mut earned = snapshot.required_approved.min(snapshot.required_types);
    if snapshot.details_complete {
        earned += 1;
    }
    if stage == Stage::Completed {
        earned += 1;
    }

    i32::try_from(earned * 100 / total_units).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        details_complete: bool,
        required_types: u64,
        pending: u64,
        rejected: u64,
        approved: u64,
    ) -> ProgressSnapshot {
        ProgressSnapshot {
            details_complete,
            required_types,
            required_docs: pending + rejected + approved,
            required_pending: pending,
            required_rejected: rejected,
            required_approved: approved,
        }
    }

    #[test]
    fn test_fresh_user_needs_personal_details() {
        let snap = snapshot(false, 5, 0, 0, 0);
        assert_eq!(derive_stage(&snap), Stage::PersonalDetails);
        assert_eq!(completion_percentage(&snap, Stage::PersonalDetails), 0);
    }

    #[test]
    fn test_complete_details_no_documents() {
        let snap = snapshot(true, 5, 0, 0, 0);
        assert_eq!(derive_stage(&snap), Stage::DocumentsUpload);
    }

    #[test]
    fn test_pending_document_wins_over_rejected() {
        // Pending outranks rejected in the priority order.
        let snap = snapshot(true, 5, 1, 1, 3);
        assert_eq!(derive_stage(&snap), Stage::AdminReview);
    }

    #[test]
    fn test_rejected_document() {
        let snap = snapshot(true, 5, 0, 2, 3);
        assert_eq!(derive_stage(&snap), Stage::Rejected);
    }

    #[test]
    fn test_all_required_approved_completes() {
        let snap = snapshot(true, 5, 0, 0, 5);
        assert_eq!(derive_stage(&snap), Stage::Completed);
        assert_eq!(completion_percentage(&snap, Stage::Completed), 100);
    }

    #[test]
    fn test_fallback_returns_to_documents_upload() {
        // Some approved, none pending or rejected, not all types covered:
        // happens when an approved document auto-expired.
        let snap = snapshot(true, 5, 0, 0, 3);
        assert_eq!(derive_stage(&snap), Stage::DocumentsUpload);
    }

    #[test]
    fn test_stage_derivation_is_idempotent() {
        let snap = snapshot(true, 3, 1, 0, 2);
        assert_eq!(derive_stage(&snap), derive_stage(&snap));
    }

    #[test]
    fn test_percentage_zero_without_required_types() {
        let snap = snapshot(true, 0, 0, 0, 0);
        assert_eq!(completion_percentage(&snap, derive_stage(&snap)), 0);
    }

    #[test]
    fn test_percentage_in_range_and_monotonic_under_approval() {
        let required = 9;
        let mut previous = -1;
        for approved in 0..=required {
            let snap = snapshot(true, required, required - approved, 0, approved);
            let stage = derive_stage(&snap);
            let pct = completion_percentage(&snap, stage);
            assert!((0..=100).contains(&pct));
            assert!(pct >= previous, "approving one more document decreased percentage");
            previous = pct;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_percentage_floors() {
        // 1 unit of 5 (N=3, +2) = 20%; details only.
        let snap = snapshot(true, 3, 0, 0, 0);
        assert_eq!(completion_percentage(&snap, Stage::DocumentsUpload), 20);
        // details + 1 approved = 2/5 = 40%.
        let snap = snapshot(true, 3, 2, 0, 1);
        assert_eq!(completion_percentage(&snap, Stage::AdminReview), 40);
    }
}
