//! Admin-only handlers. Routed behind [`super::auth::require_reviewer`],
//! so every caller here already holds the admin or coordinator role.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::progress::map_dashboard;
use super::validation::validate_document_id;
use super::{ApiError, ApiResponse, AppState, DashboardDto, DocumentDto, ProgressDto};
use crate::domain::{DocumentStatus, Stage};

#[derive(Deserialize)]
pub struct OnboardingListQuery {
    /// Optional stage filter, e.g. `?stage=admin_review`
    pub stage: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /admin/onboarding
/// Every user's onboarding progress, newest activity first
pub async fn list_onboarding(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OnboardingListQuery>,
) -> Result<Json<ApiResponse<Vec<ProgressDto>>>, ApiError> {
    let stage = match query.stage.as_deref() {
        None => None,
        Some(raw) => Some(
            Stage::parse(raw)
                .ok_or_else(|| ApiError::validation(format!("Unknown stage: {raw}")))?,
        ),
    };

    let rows = state.shared.onboarding_service.list_progress(stage).await?;

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(ProgressDto::from).collect(),
    )))
}

/// GET /admin/users/{id}/onboarding
/// One user's full onboarding dashboard
pub async fn user_onboarding_detail(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let user = state
        .shared
        .store
        .get_user_by_id(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", user_id))?;

    let dashboard = state.shared.onboarding_service.dashboard(user.id).await?;

    Ok(Json(ApiResponse::success(map_dashboard(dashboard))))
}

/// PATCH /admin/documents/{id}/review
/// Approve or reject a document, stamping the reviewer
pub async fn review_document(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(reviewer)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<DocumentDto>>, ApiError> {
    validate_document_id(id)?;

    let verdict = match DocumentStatus::parse(&payload.status) {
        Some(v @ (DocumentStatus::Approved | DocumentStatus::Rejected)) => v,
        _ => {
            return Err(ApiError::validation(
                "Status must be 'approved' or 'rejected'",
            ));
        }
    };

    let notes = payload.notes.filter(|n| !n.trim().is_empty());

    let document = state
        .shared
        .document_service
        .review(&reviewer, id, verdict, notes)
        .await?;

    Ok(Json(ApiResponse::success(DocumentDto::from(document))))
}

/// GET /admin/documents/pending
/// All documents awaiting review, newest first
pub async fn pending_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DocumentDto>>>, ApiError> {
    let documents = state.shared.document_service.pending().await?;

    Ok(Json(ApiResponse::success(
        documents.into_iter().map(DocumentDto::from).collect(),
    )))
}

/// GET /admin/documents/expiring
/// Approved documents inside the expiry warning window, soonest first
pub async fn expiring_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DocumentDto>>>, ApiError> {
    let documents = state.shared.document_service.expiring().await?;

    Ok(Json(ApiResponse::success(
        documents.into_iter().map(DocumentDto::from).collect(),
    )))
}
