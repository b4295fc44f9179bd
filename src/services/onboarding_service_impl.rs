//! `SeaORM` implementation of the `OnboardingService` trait.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::db::{PersonalDetails, PersonalDetailsUpdate, Progress, ProgressWithUser, Store};
use crate::domain::{ProgressSnapshot, Stage, completion_percentage, derive_stage};
use crate::services::onboarding_service::{Dashboard, OnboardingError, OnboardingService};

pub struct SeaOrmOnboardingService {
    store: Store,
}

impl SeaOrmOnboardingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Collects the derivation inputs for one user.
    async fn snapshot(&self, user_id: i32) -> Result<ProgressSnapshot, OnboardingError> {
        let details = self.store.get_personal_details(user_id).await?;
        let details_complete = details.as_ref().is_some_and(PersonalDetails::is_complete);

        let required_types = self.store.count_required_document_types().await?;
        let counts = self.store.required_doc_counts(user_id).await?;

        Ok(ProgressSnapshot {
            details_complete,
            required_types,
            required_docs: counts.total,
            required_pending: counts.pending,
            required_rejected: counts.rejected,
            required_approved: counts.approved,
        })
    }
}

#[async_trait]
impl OnboardingService for SeaOrmOnboardingService {
    async fn personal_details(&self, user_id: i32) -> Result<PersonalDetails, OnboardingError> {
        Ok(self.store.get_or_create_personal_details(user_id).await?)
    }

    async fn update_personal_details(
        &self,
        user_id: i32,
        update: PersonalDetailsUpdate,
    ) -> Result<PersonalDetails, OnboardingError> {
        let details = self.store.update_personal_details(user_id, update).await?;

        if details.is_complete() {
            self.store.mark_personal_details_complete(user_id).await?;
        }

        self.recompute(user_id).await?;

        Ok(details)
    }

    async fn progress(&self, user_id: i32) -> Result<Progress, OnboardingError> {
        self.recompute(user_id).await
    }

    async fn recompute(&self, user_id: i32) -> Result<Progress, OnboardingError> {
        let snapshot = self.snapshot(user_id).await?;
        let stage = derive_stage(&snapshot);
        let percentage = completion_percentage(&snapshot, stage);

        tracing::debug!(
            user_id,
            stage = %stage,
            percentage,
            "Recomputed onboarding progress"
        );

        Ok(self
            .store
            .store_progress_derivation(user_id, stage, percentage)
            .await?)
    }

    async fn dashboard(&self, user_id: i32) -> Result<Dashboard, OnboardingError> {
        let personal_details = self.store.get_personal_details(user_id).await?;
        let progress = self.store.get_or_create_progress(user_id).await?;
        let documents = self.store.list_documents_for_user(user_id).await?;
        let required_types = self.store.list_required_document_types().await?;

        let uploaded: HashSet<&str> = documents
            .iter()
            .map(|d| d.document_type_name.as_str())
            .collect();
        let mut missing_documents: Vec<String> = required_types
            .iter()
            .filter(|t| !uploaded.contains(t.name.as_str()))
            .map(|t| t.name.clone())
            .collect();
        missing_documents.sort();

        Ok(Dashboard {
            personal_details,
            progress,
            documents,
            required_types,
            missing_documents,
        })
    }

    async fn list_progress(
        &self,
        stage: Option<Stage>,
    ) -> Result<Vec<ProgressWithUser>, OnboardingError> {
        Ok(self.store.list_progress_with_users(stage).await?)
    }
}
