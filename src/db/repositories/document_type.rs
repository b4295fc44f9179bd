use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::document_types;

/// Catalog entry for a document type.
#[derive(Debug, Clone)]
pub struct DocumentType {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_required: bool,
    pub has_expiry: bool,
    pub max_file_size_mb: i32,
    pub allowed_extensions: String,
}

impl DocumentType {
    /// Normalized extension list parsed from the comma-separated column.
    #[must_use]
    pub fn allowed_extension_list(&self) -> Vec<String> {
        self.allowed_extensions
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    #[must_use]
    pub const fn max_file_size_bytes(&self) -> i64 {
        self.max_file_size_mb as i64 * 1024 * 1024
    }
}

impl From<document_types::Model> for DocumentType {
    fn from(model: document_types::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            display_name: model.display_name,
            description: model.description,
            is_required: model.is_required,
            has_expiry: model.has_expiry,
            max_file_size_mb: model.max_file_size_mb,
            allowed_extensions: model.allowed_extensions,
        }
    }
}

/// Seedable definition of a catalog entry. `name` is the upsert key.
#[derive(Debug, Clone)]
pub struct DocumentTypeSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub is_required: bool,
    pub has_expiry: bool,
    pub max_file_size_mb: i32,
    pub allowed_extensions: &'static str,
}

pub struct DocumentTypeRepository {
    conn: DatabaseConnection,
}

impl DocumentTypeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<DocumentType>> {
        let rows = document_types::Entity::find()
            .order_by_asc(document_types::Column::DisplayName)
            .all(&self.conn)
            .await
            .context("Failed to list document types")?;

        Ok(rows.into_iter().map(DocumentType::from).collect())
    }

    pub async fn list_required(&self) -> Result<Vec<DocumentType>> {
        let rows = document_types::Entity::find()
            .filter(document_types::Column::IsRequired.eq(true))
            .order_by_asc(document_types::Column::DisplayName)
            .all(&self.conn)
            .await
            .context("Failed to list required document types")?;

        Ok(rows.into_iter().map(DocumentType::from).collect())
    }

    pub async fn count_required(&self) -> Result<u64> {
        let count = document_types::Entity::find()
            .filter(document_types::Column::IsRequired.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count required document types")?;

        Ok(count)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<DocumentType>> {
        let row = document_types::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query document type")?;

        Ok(row.map(DocumentType::from))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<DocumentType>> {
        let row = document_types::Entity::find()
            .filter(document_types::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query document type by name")?;

        Ok(row.map(DocumentType::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extension_list_normalizes() {
        let doc_type = DocumentType {
            id: 1,
            name: "police_check".to_string(),
            display_name: "National Police Check".to_string(),
            description: None,
            is_required: true,
            has_expiry: true,
            max_file_size_mb: 5,
            allowed_extensions: "PDF, jpg , jpeg,png,".to_string(),
        };
        assert_eq!(doc_type.allowed_extension_list(), ["pdf", "jpg", "jpeg", "png"]);
        assert_eq!(doc_type.max_file_size_bytes(), 5 * 1024 * 1024);
    }
}
