use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{DocumentStatus, effective_status};
use crate::entities::{document_types, documents};

/// Document row joined with its type, as used by services and handlers.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: i32,
    pub user_id: i32,
    pub document_type_id: i32,
    pub document_type_name: String,
    pub document_type_display_name: String,
    pub type_is_required: bool,
    pub stored_path: String,
    pub original_filename: String,
    pub file_size: i64,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub document_number: Option<String>,
    pub issuing_authority: Option<String>,
    pub status: DocumentStatus,
    pub notes: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<String>,
    pub uploaded_at: String,
    pub updated_at: String,
}

/// Input for an upload. Status is derived, never supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: i32,
    pub document_type_id: i32,
    pub stored_path: String,
    pub original_filename: String,
    pub file_size: i64,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub document_number: Option<String>,
    pub issuing_authority: Option<String>,
}

/// Per-user counts over required-type documents, input to stage derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredDocCounts {
    pub total: u64,
    pub pending: u64,
    pub rejected: u64,
    pub approved: u64,
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn map_document(model: documents::Model, doc_type: Option<document_types::Model>) -> Document {
    let status = DocumentStatus::parse(&model.status).unwrap_or(DocumentStatus::Pending);

    let (type_name, type_display, type_required) = doc_type.map_or_else(
        || (String::new(), String::new(), false),
        |t| (t.name, t.display_name, t.is_required),
    );

    Document {
        id: model.id,
        user_id: model.user_id,
        document_type_id: model.document_type_id,
        document_type_name: type_name,
        document_type_display_name: type_display,
        type_is_required: type_required,
        stored_path: model.stored_path,
        original_filename: model.original_filename,
        file_size: model.file_size,
        issue_date: parse_date(model.issue_date.as_deref()),
        expiry_date: parse_date(model.expiry_date.as_deref()),
        document_number: model.document_number,
        issuing_authority: model.issuing_authority,
        status,
        notes: model.notes,
        reviewed_by: model.reviewed_by,
        reviewed_at: model.reviewed_at,
        uploaded_at: model.uploaded_at,
        updated_at: model.updated_at,
    }
}

pub struct DocumentRepository {
    conn: DatabaseConnection,
}

impl DocumentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Document>> {
        let row = documents::Entity::find_by_id(id)
            .find_also_related(document_types::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query document")?;

        Ok(row.map(|(model, doc_type)| map_document(model, doc_type)))
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Document>> {
        let rows = documents::Entity::find()
            .filter(documents::Column::UserId.eq(user_id))
            .find_also_related(document_types::Entity)
            .order_by_desc(documents::Column::UploadedAt)
            .all(&self.conn)
            .await
            .context("Failed to list documents for user")?;

        Ok(rows
            .into_iter()
            .map(|(model, doc_type)| map_document(model, doc_type))
            .collect())
    }

    /// Replaces any existing document of the same type inside one
    /// transaction. Returns the new row id and, when a row was replaced,
    /// the blob path the caller must delete after commit.
    pub async fn replace_for_type(
        &self,
        new: NewDocument,
        today: NaiveDate,
    ) -> Result<(i32, Option<String>)> {
        let now = chrono::Utc::now().to_rfc3339();
        let status = effective_status(DocumentStatus::Pending, new.expiry_date, today);

        let txn = self.conn.begin().await?;

        let existing = documents::Entity::find()
            .filter(documents::Column::UserId.eq(new.user_id))
            .filter(documents::Column::DocumentTypeId.eq(new.document_type_id))
            .one(&txn)
            .await?;

        let replaced_blob = if let Some(old) = existing {
            let path = old.stored_path.clone();
            documents::Entity::delete_by_id(old.id).exec(&txn).await?;
            Some(path)
        } else {
            None
        };

        let active = documents::ActiveModel {
            user_id: Set(new.user_id),
            document_type_id: Set(new.document_type_id),
            stored_path: Set(new.stored_path),
            original_filename: Set(new.original_filename),
            file_size: Set(new.file_size),
            issue_date: Set(new.issue_date.map(|d| d.to_string())),
            expiry_date: Set(new.expiry_date.map(|d| d.to_string())),
            document_number: Set(new.document_number),
            issuing_authority: Set(new.issuing_authority),
            status: Set(status.as_str().to_string()),
            uploaded_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = active.insert(&txn).await?;

        txn.commit().await?;

        Ok((inserted.id, replaced_blob))
    }

    /// Deletes a document row, returning its blob path when it existed.
    pub async fn delete(&self, id: i32) -> Result<Option<String>> {
        let Some(model) = documents::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let stored_path = model.stored_path.clone();
        documents::Entity::delete_by_id(model.id)
            .exec(&self.conn)
            .await?;

        Ok(Some(stored_path))
    }

    /// Applies an admin review verdict. The expiry classification runs
    /// again on this save, so approving an already-expired document still
    /// lands on `expired`.
    pub async fn review(
        &self,
        id: i32,
        verdict: DocumentStatus,
        notes: Option<String>,
        reviewer_id: i32,
        today: NaiveDate,
    ) -> Result<Option<Document>> {
        let Some(model) = documents::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let expiry = parse_date(model.expiry_date.as_deref());
        let status = effective_status(verdict, expiry, today);
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: documents::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.notes = Set(notes);
        active.reviewed_by = Set(Some(reviewer_id));
        active.reviewed_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        self.get(id).await
    }

    pub async fn list_pending(&self) -> Result<Vec<Document>> {
        let rows = documents::Entity::find()
            .filter(documents::Column::Status.eq(DocumentStatus::Pending.as_str()))
            .find_also_related(document_types::Entity)
            .order_by_desc(documents::Column::UploadedAt)
            .all(&self.conn)
            .await
            .context("Failed to list pending documents")?;

        Ok(rows
            .into_iter()
            .map(|(model, doc_type)| map_document(model, doc_type))
            .collect())
    }

    /// Approved documents whose expiry date falls on or before the
    /// threshold. ISO dates compare lexicographically, so a plain string
    /// comparison is chronological here.
    pub async fn list_expiring(&self, threshold: NaiveDate) -> Result<Vec<Document>> {
        let rows = documents::Entity::find()
            .filter(documents::Column::Status.is_in([
                DocumentStatus::Approved.as_str(),
                DocumentStatus::ExpiringSoon.as_str(),
            ]))
            .filter(documents::Column::ExpiryDate.is_not_null())
            .filter(documents::Column::ExpiryDate.lte(threshold.to_string()))
            .find_also_related(document_types::Entity)
            .order_by_asc(documents::Column::ExpiryDate)
            .all(&self.conn)
            .await
            .context("Failed to list expiring documents")?;

        Ok(rows
            .into_iter()
            .map(|(model, doc_type)| map_document(model, doc_type))
            .collect())
    }

    /// Counts the user's required-type documents by status.
    pub async fn required_counts(&self, user_id: i32) -> Result<RequiredDocCounts> {
        let rows = documents::Entity::find()
            .filter(documents::Column::UserId.eq(user_id))
            .find_also_related(document_types::Entity)
            .all(&self.conn)
            .await
            .context("Failed to count documents for user")?;

        let mut counts = RequiredDocCounts::default();
        for (model, doc_type) in rows {
            if !doc_type.is_some_and(|t| t.is_required) {
                continue;
            }
            counts.total += 1;
            match DocumentStatus::parse(&model.status) {
                Some(DocumentStatus::Pending) => counts.pending += 1,
                Some(DocumentStatus::Rejected) => counts.rejected += 1,
                Some(DocumentStatus::Approved) => counts.approved += 1,
                _ => {}
            }
        }

        Ok(counts)
    }

    /// Raw rows for the metadata backfill maintenance command.
    pub async fn list_all_models(&self) -> Result<Vec<documents::Model>> {
        Ok(documents::Entity::find().all(&self.conn).await?)
    }

    pub async fn update_file_metadata(
        &self,
        id: i32,
        original_filename: String,
        file_size: i64,
    ) -> Result<()> {
        let Some(model) = documents::Entity::find_by_id(id).one(&self.conn).await? else {
            anyhow::bail!("Document not found: {id}");
        };

        let mut active: documents::ActiveModel = model.into();
        active.original_filename = Set(original_filename);
        active.file_size = Set(file_size);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }
}
