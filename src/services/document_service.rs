//! Domain service for compliance documents.
//!
//! Upload, replacement, deletion, admin review, and the two admin
//! listings. Every mutation ends with a progress recomputation for the
//! affected user.

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::{Document, DocumentType, User};
use crate::domain::DocumentStatus;

/// Errors specific to document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found")]
    NotFound,

    #[error("Document type not found")]
    TypeNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Permission denied")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DocumentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DocumentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Parsed multipart upload payload.
#[derive(Debug)]
pub struct DocumentUpload {
    pub document_type_id: i32,
    pub original_filename: String,
    pub bytes: Vec<u8>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub document_number: Option<String>,
    pub issuing_authority: Option<String>,
}

/// Outcome of the metadata backfill maintenance pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixMetadataReport {
    pub scanned: usize,
    pub fixed: usize,
}

/// Domain service trait for documents.
#[async_trait::async_trait]
pub trait DocumentService: Send + Sync {
    /// Full catalog, required and optional.
    async fn list_types(&self) -> Result<Vec<DocumentType>, DocumentError>;

    /// The caller's documents, newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Document>, DocumentError>;

    /// Stores the blob and creates the row, replacing any existing
    /// document of the same type (the prior row and blob are removed and
    /// review starts over at `pending`).
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Validation`] when the file breaks the
    /// type's size or extension constraints.
    async fn upload(&self, user_id: i32, upload: DocumentUpload) -> Result<Document, DocumentError>;

    /// Deletes one of the caller's documents, row and blob.
    async fn delete(&self, user_id: i32, document_id: i32) -> Result<(), DocumentError>;

    /// Reads one of the caller's blobs back for download.
    async fn open_file(
        &self,
        user_id: i32,
        document_id: i32,
    ) -> Result<(Document, Vec<u8>), DocumentError>;

    /// Applies an admin verdict (`approved` or `rejected` only), stamps
    /// the reviewer, and recomputes the owner's progress.
    async fn review(
        &self,
        reviewer: &User,
        document_id: i32,
        verdict: DocumentStatus,
        notes: Option<String>,
    ) -> Result<Document, DocumentError>;

    /// All documents awaiting review, newest first.
    async fn pending(&self) -> Result<Vec<Document>, DocumentError>;

    /// Approved documents expiring within the warning window, soonest
    /// first.
    async fn expiring(&self) -> Result<Vec<Document>, DocumentError>;

    /// Backfills missing filename/size metadata from blobs on disk.
    /// Unreadable blobs are logged and recorded with size 0 instead of
    /// failing the batch.
    async fn fix_metadata(&self) -> Result<FixMetadataReport, DocumentError>;
}
