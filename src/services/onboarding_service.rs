//! Domain service for the onboarding progress tracker.
//!
//! Owns the recompute path: every personal-details or document mutation
//! funnels through [`OnboardingService::recompute`], which rebuilds the
//! cached stage and percentage from the underlying rows.

use thiserror::Error;

use crate::db::{Document, DocumentType, PersonalDetails, PersonalDetailsUpdate, Progress, ProgressWithUser};
use crate::domain::Stage;

/// Errors specific to onboarding operations.
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for OnboardingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OnboardingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Aggregate view backing `GET /dashboard`.
#[derive(Debug)]
pub struct Dashboard {
    /// `None` until the user first touches their personal details.
    pub personal_details: Option<PersonalDetails>,
    pub progress: Progress,
    pub documents: Vec<Document>,
    pub required_types: Vec<DocumentType>,
    /// Required type names with no uploaded document, any status.
    pub missing_documents: Vec<String>,
}

/// Domain service trait for onboarding progress.
#[async_trait::async_trait]
pub trait OnboardingService: Send + Sync {
    /// The caller's personal details, lazily created empty.
    async fn personal_details(&self, user_id: i32) -> Result<PersonalDetails, OnboardingError>;

    /// Replaces the personal-details record, stamps the completeness
    /// milestone on first completion, and recomputes progress.
    async fn update_personal_details(
        &self,
        user_id: i32,
        update: PersonalDetailsUpdate,
    ) -> Result<PersonalDetails, OnboardingError>;

    /// Recomputes and returns the caller's progress.
    async fn progress(&self, user_id: i32) -> Result<Progress, OnboardingError>;

    /// Rebuilds the cached stage/percentage from current rows.
    async fn recompute(&self, user_id: i32) -> Result<Progress, OnboardingError>;

    /// Aggregate dashboard for one user.
    async fn dashboard(&self, user_id: i32) -> Result<Dashboard, OnboardingError>;

    /// Every user's progress for the admin overview.
    async fn list_progress(
        &self,
        stage: Option<Stage>,
    ) -> Result<Vec<ProgressWithUser>, OnboardingError>;
}
