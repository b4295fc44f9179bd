use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, DashboardDto, DocumentDto, DocumentTypeDto, PersonalDetailsDto, ProgressDto};
use crate::services::Dashboard;

/// GET /progress
/// Recompute and return the caller's onboarding progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ProgressDto>>, ApiError> {
    let progress = state.shared.onboarding_service.progress(user.id).await?;

    Ok(Json(ApiResponse::success(ProgressDto::from(progress))))
}

/// GET /dashboard
/// Aggregate onboarding view for the caller
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let dashboard = state.shared.onboarding_service.dashboard(user.id).await?;

    Ok(Json(ApiResponse::success(map_dashboard(dashboard))))
}

pub(super) fn map_dashboard(dashboard: Dashboard) -> DashboardDto {
    DashboardDto {
        personal_details: dashboard.personal_details.map(PersonalDetailsDto::from),
        progress: ProgressDto::from(dashboard.progress),
        documents: dashboard
            .documents
            .into_iter()
            .map(DocumentDto::from)
            .collect(),
        required_document_types: dashboard
            .required_types
            .into_iter()
            .map(DocumentTypeDto::from)
            .collect(),
        missing_documents: dashboard.missing_documents,
    }
}
