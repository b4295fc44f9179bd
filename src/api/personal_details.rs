use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_date_of_birth, validate_optional_phone};
use super::{ApiError, ApiResponse, AppState, PersonalDetailsDto, PersonalDetailsRequest};
use crate::db::PersonalDetailsUpdate;

/// GET /personal-details
/// Fetch the caller's personal details, creating an empty record on first
/// access.
pub async fn get_personal_details(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<PersonalDetailsDto>>, ApiError> {
    let details = state
        .shared
        .onboarding_service
        .personal_details(user.id)
        .await?;

    Ok(Json(ApiResponse::success(PersonalDetailsDto::from(details))))
}

/// PUT /personal-details
/// Replace the caller's personal details and recompute progress.
pub async fn update_personal_details(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PersonalDetailsRequest>,
) -> Result<Json<ApiResponse<PersonalDetailsDto>>, ApiError> {
    validate_date_of_birth(payload.date_of_birth.as_deref())?;
    validate_optional_phone(payload.phone_number.as_deref())?;
    validate_optional_phone(payload.emergency_contact_phone.as_deref())?;

    let update = PersonalDetailsUpdate {
        date_of_birth: normalize(payload.date_of_birth),
        phone_number: normalize(payload.phone_number),
        address_line1: normalize(payload.address_line1),
        address_line2: normalize(payload.address_line2),
        suburb: normalize(payload.suburb),
        state: normalize(payload.state),
        postcode: normalize(payload.postcode),
        emergency_contact_name: normalize(payload.emergency_contact_name),
        emergency_contact_phone: normalize(payload.emergency_contact_phone),
        emergency_contact_relationship: normalize(payload.emergency_contact_relationship),
        abn_number: normalize(payload.abn_number),
        tfn_number: normalize(payload.tfn_number),
        bank_account_name: normalize(payload.bank_account_name),
        bank_bsb: normalize(payload.bank_bsb),
        bank_account_number: normalize(payload.bank_account_number),
    };

    let details = state
        .shared
        .onboarding_service
        .update_personal_details(user.id, update)
        .await?;

    Ok(Json(ApiResponse::success(PersonalDetailsDto::from(details))))
}

/// Trims whitespace and collapses empty strings to NULL.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
