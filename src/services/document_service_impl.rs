//! `SeaORM` implementation of the `DocumentService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::db::{Document, DocumentType, NewDocument, Store, User};
use crate::domain::{DocumentStatus, EXPIRY_WARNING_DAYS};
use crate::services::document_service::{
    DocumentError, DocumentService, DocumentUpload, FixMetadataReport,
};
use crate::services::onboarding_service::OnboardingService;
use crate::storage::{DocumentStorage, extension_of};

pub struct SeaOrmDocumentService {
    store: Store,
    storage: DocumentStorage,
    onboarding: Arc<dyn OnboardingService>,
}

impl SeaOrmDocumentService {
    pub fn new(
        store: Store,
        storage: DocumentStorage,
        onboarding: Arc<dyn OnboardingService>,
    ) -> Self {
        Self {
            store,
            storage,
            onboarding,
        }
    }

    fn validate_file(upload: &DocumentUpload, doc_type: &DocumentType) -> Result<(), DocumentError> {
        if upload.bytes.is_empty() {
            return Err(DocumentError::Validation("File is empty".to_string()));
        }

        let size = upload.bytes.len() as i64;
        if size > doc_type.max_file_size_bytes() {
            return Err(DocumentError::Validation(format!(
                "File size cannot exceed {}MB",
                doc_type.max_file_size_mb
            )));
        }

        let allowed = doc_type.allowed_extension_list();
        let ext = extension_of(&upload.original_filename);
        match ext {
            Some(ref ext) if allowed.iter().any(|a| a == ext) => Ok(()),
            _ => Err(DocumentError::Validation(format!(
                "File type '{}' not allowed. Allowed types: {}",
                ext.unwrap_or_default(),
                allowed.join(", ")
            ))),
        }
    }

    async fn recompute_for(&self, user_id: i32) {
        if let Err(e) = self.onboarding.recompute(user_id).await {
            warn!("Failed to recompute progress for user {user_id}: {e}");
        }
    }
}

#[async_trait]
impl DocumentService for SeaOrmDocumentService {
    async fn list_types(&self) -> Result<Vec<DocumentType>, DocumentError> {
        Ok(self.store.list_document_types().await?)
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Document>, DocumentError> {
        Ok(self.store.list_documents_for_user(user_id).await?)
    }

    async fn upload(
        &self,
        user_id: i32,
        upload: DocumentUpload,
    ) -> Result<Document, DocumentError> {
        let doc_type = self
            .store
            .get_document_type(upload.document_type_id)
            .await?
            .ok_or(DocumentError::TypeNotFound)?;

        Self::validate_file(&upload, &doc_type)?;

        let stored_path = self
            .storage
            .save(&upload.original_filename, &upload.bytes)
            .await?;

        let today = chrono::Utc::now().date_naive();
        let new = NewDocument {
            user_id,
            document_type_id: doc_type.id,
            stored_path: stored_path.clone(),
            original_filename: upload.original_filename,
            file_size: upload.bytes.len() as i64,
            issue_date: upload.issue_date,
            expiry_date: upload.expiry_date,
            document_number: upload.document_number,
            issuing_authority: upload.issuing_authority,
        };

        let (document_id, replaced_blob) = match self.store.replace_document(new, today).await {
            Ok(result) => result,
            Err(e) => {
                // The row never landed; don't leave the fresh blob orphaned.
                if let Err(cleanup) = self.storage.delete(&stored_path).await {
                    warn!("Failed to clean up blob {stored_path}: {cleanup}");
                }
                return Err(e.into());
            }
        };

        // Blob deletion is outside the row transaction; a crash here
        // orphans the old file but keeps the database consistent.
        if let Some(old_blob) = replaced_blob {
            if let Err(e) = self.storage.delete(&old_blob).await {
                warn!("Failed to delete replaced blob {old_blob}: {e}");
            }
        }

        self.store.mark_documents_uploaded(user_id).await?;
        self.recompute_for(user_id).await;

        let document = self
            .store
            .get_document(document_id)
            .await?
            .ok_or(DocumentError::NotFound)?;

        tracing::info!(
            user_id,
            document_type = %document.document_type_name,
            "Document uploaded"
        );

        Ok(document)
    }

    async fn delete(&self, user_id: i32, document_id: i32) -> Result<(), DocumentError> {
        let document = self
            .store
            .get_document(document_id)
            .await?
            .ok_or(DocumentError::NotFound)?;

        if document.user_id != user_id {
            return Err(DocumentError::Forbidden);
        }

        if let Some(blob) = self.store.delete_document(document_id).await? {
            if let Err(e) = self.storage.delete(&blob).await {
                warn!("Failed to delete blob {blob}: {e}");
            }
        }

        self.recompute_for(user_id).await;

        Ok(())
    }

    async fn open_file(
        &self,
        user_id: i32,
        document_id: i32,
    ) -> Result<(Document, Vec<u8>), DocumentError> {
        let document = self
            .store
            .get_document(document_id)
            .await?
            .ok_or(DocumentError::NotFound)?;

        if document.user_id != user_id {
            return Err(DocumentError::Forbidden);
        }

        let bytes = self.storage.read(&document.stored_path).await?;
        Ok((document, bytes))
    }

    async fn review(
        &self,
        reviewer: &User,
        document_id: i32,
        verdict: DocumentStatus,
        notes: Option<String>,
    ) -> Result<Document, DocumentError> {
        if !reviewer.role.can_review() {
            return Err(DocumentError::Forbidden);
        }

        if !matches!(verdict, DocumentStatus::Approved | DocumentStatus::Rejected) {
            return Err(DocumentError::Validation(
                "Status must be 'approved' or 'rejected'".to_string(),
            ));
        }

        let today = chrono::Utc::now().date_naive();
        let document = self
            .store
            .review_document(document_id, verdict, notes, reviewer.id, today)
            .await?
            .ok_or(DocumentError::NotFound)?;

        self.recompute_for(document.user_id).await;

        tracing::info!(
            document_id,
            user_id = document.user_id,
            verdict = %verdict,
            reviewer = %reviewer.username,
            "Document reviewed"
        );

        Ok(document)
    }

    async fn pending(&self) -> Result<Vec<Document>, DocumentError> {
        Ok(self.store.list_pending_documents().await?)
    }

    async fn expiring(&self) -> Result<Vec<Document>, DocumentError> {
        let threshold =
            chrono::Utc::now().date_naive() + chrono::Days::new(EXPIRY_WARNING_DAYS as u64);
        Ok(self.store.list_expiring_documents(threshold).await?)
    }

    async fn fix_metadata(&self) -> Result<FixMetadataReport, DocumentError> {
        let documents = self.store.list_all_document_models().await?;
        let mut report = FixMetadataReport {
            scanned: documents.len(),
            fixed: 0,
        };

        for document in documents {
            let mut filename = document.original_filename.clone();
            let mut size = document.file_size;
            let mut needs_update = false;

            if filename.trim().is_empty() {
                filename = document
                    .stored_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(&document.stored_path)
                    .to_string();
                needs_update = true;
            }

            if size <= 0 {
                size = match self.storage.size(&document.stored_path).await {
                    Ok(len) => i64::try_from(len).unwrap_or(i64::MAX),
                    Err(e) => {
                        warn!(
                            "Could not get size for blob {}: {e}",
                            document.stored_path
                        );
                        0
                    }
                };
                needs_update = true;
            }

            if needs_update {
                self.store
                    .update_document_file_metadata(document.id, filename, size)
                    .await?;
                report.fixed += 1;
            }
        }

        Ok(report)
    }
}
