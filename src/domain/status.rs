use serde::{Deserialize, Serialize};

/// Review status of an uploaded document. Stored as its `as_str` form.
///
/// `expired` and `expiring_soon` are assigned automatically on save based on
/// the expiry date; the other three are set by upload and admin review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
    ExpiringSoon,
}

impl DocumentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring_soon",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            "expiring_soon" => Some(Self::ExpiringSoon),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse lifecycle bucket for a user's onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NotStarted,
    PersonalDetails,
    DocumentsUpload,
    AdminReview,
    Completed,
    Rejected,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::PersonalDetails => "personal_details",
            Self::DocumentsUpload => "documents_upload",
            Self::AdminReview => "admin_review",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "personal_details" => Some(Self::PersonalDetails),
            "documents_upload" => Some(Self::DocumentsUpload),
            "admin_review" => Some(Self::AdminReview),
            "completed" => Some(Self::Completed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Approved,
            DocumentStatus::Rejected,
            DocumentStatus::Expired,
            DocumentStatus::ExpiringSoon,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("unknown"), None);
    }

    #[test]
    fn test_stage_round_trip() {
        for stage in [
            Stage::NotStarted,
            Stage::PersonalDetails,
            Stage::DocumentsUpload,
            Stage::AdminReview,
            Stage::Completed,
            Stage::Rejected,
        ] {
            assert_eq!(Stage::parse(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::ExpiringSoon).unwrap();
        assert_eq!(json, "\"expiring_soon\"");
        let json = serde_json::to_string(&Stage::AdminReview).unwrap();
        assert_eq!(json, "\"admin_review\"");
    }
}
