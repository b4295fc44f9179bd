use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_document_id, validate_optional_date};
use super::{ApiError, ApiResponse, AppState, DocumentDto, DocumentTypeDto};
use crate::services::DocumentUpload;

/// Hard request cap for uploads; the per-type limit is enforced against
/// the catalog after parsing.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// GET /document-types
/// List the full document-type catalog
pub async fn list_document_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DocumentTypeDto>>>, ApiError> {
    let types = state.shared.document_service.list_types().await?;

    Ok(Json(ApiResponse::success(
        types.into_iter().map(DocumentTypeDto::from).collect(),
    )))
}

/// GET /documents
/// List the caller's documents, newest first
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<DocumentDto>>>, ApiError> {
    let documents = state.shared.document_service.list_for_user(user.id).await?;

    Ok(Json(ApiResponse::success(
        documents.into_iter().map(DocumentDto::from).collect(),
    )))
}

/// POST /documents (and /documents/upload)
/// Multipart upload: `file` plus `document_type` and optional metadata
/// fields. Replaces any existing document of the same type.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut document_type: Option<i32> = None;
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut issue_date: Option<String> = None;
    let mut expiry_date: Option<String> = None;
    let mut document_number: Option<String> = None;
    let mut issuing_authority: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "document_type" => {
                let text = read_text(field).await?;
                let id = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| ApiError::validation("document_type must be an integer ID"))?;
                document_type = Some(id);
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map_or_else(|| "upload".to_string(), str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            "issue_date" => issue_date = Some(read_text(field).await?),
            "expiry_date" => expiry_date = Some(read_text(field).await?),
            "document_number" => document_number = Some(read_text(field).await?),
            "issuing_authority" => issuing_authority = Some(read_text(field).await?),
            _ => {}
        }
    }

    let document_type = document_type
        .ok_or_else(|| ApiError::validation("document_type is required"))
        .and_then(validate_document_id)?;
    let (original_filename, bytes) =
        file.ok_or_else(|| ApiError::validation("file is required"))?;

    let upload = DocumentUpload {
        document_type_id: document_type,
        original_filename,
        bytes,
        issue_date: validate_optional_date(issue_date.as_deref(), "issue_date")?,
        expiry_date: validate_optional_date(expiry_date.as_deref(), "expiry_date")?,
        document_number: document_number.filter(|s| !s.trim().is_empty()),
        issuing_authority: issuing_authority.filter(|s| !s.trim().is_empty()),
    };

    let document = state.shared.document_service.upload(user.id, upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DocumentDto::from(document))),
    ))
}

/// DELETE /documents/{id}
/// Remove one of the caller's documents, row and blob
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_document_id(id)?;

    state.shared.document_service.delete(user.id, id).await?;

    Ok(Json(ApiResponse::success(())))
}

/// GET /documents/{id}/file
/// Stream one of the caller's blobs back
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    validate_document_id(id)?;

    let (document, bytes) = state.shared.document_service.open_file(user.id, id).await?;

    let content_type = mime_guess::from_path(&document.original_filename)
        .first_or_octet_stream()
        .to_string();
    let disposition = format!(
        "attachment; filename=\"{}\"",
        document.original_filename.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart field: {e}")))
}
