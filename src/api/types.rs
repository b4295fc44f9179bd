use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{Document, DocumentType, PersonalDetails, Progress, ProgressWithUser, User};
use crate::domain::{DocumentStatus, Role, Stage, days_until_expiry, is_expired, is_expiring_soon};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonalDetailsDto {
    pub id: i32,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub abn_number: Option<String>,
    pub tfn_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub bank_bsb: Option<String>,
    pub bank_account_number: Option<String>,
    pub is_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PersonalDetails> for PersonalDetailsDto {
    fn from(details: PersonalDetails) -> Self {
        let is_complete = details.is_complete();
        Self {
            id: details.id,
            date_of_birth: details.date_of_birth,
            phone_number: details.phone_number,
            address_line1: details.address_line1,
            address_line2: details.address_line2,
            suburb: details.suburb,
            state: details.state,
            postcode: details.postcode,
            emergency_contact_name: details.emergency_contact_name,
            emergency_contact_phone: details.emergency_contact_phone,
            emergency_contact_relationship: details.emergency_contact_relationship,
            abn_number: details.abn_number,
            tfn_number: details.tfn_number,
            bank_account_name: details.bank_account_name,
            bank_bsb: details.bank_bsb,
            bank_account_number: details.bank_account_number,
            is_complete,
            created_at: details.created_at,
            updated_at: details.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentTypeDto {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_required: bool,
    pub has_expiry: bool,
    pub max_file_size_mb: i32,
    pub allowed_extensions: Vec<String>,
}

impl From<DocumentType> for DocumentTypeDto {
    fn from(doc_type: DocumentType) -> Self {
        let allowed_extensions = doc_type.allowed_extension_list();
        Self {
            id: doc_type.id,
            name: doc_type.name,
            display_name: doc_type.display_name,
            description: doc_type.description,
            is_required: doc_type.is_required,
            has_expiry: doc_type.has_expiry,
            max_file_size_mb: doc_type.max_file_size_mb,
            allowed_extensions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentDto {
    pub id: i32,
    pub user_id: i32,
    pub document_type: i32,
    pub document_type_name: String,
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
    pub days_until_expiry: Option<i64>,
    pub is_expired: bool,
    pub is_expiring_soon: bool,
}

impl From<Document> for DocumentDto {
    fn from(document: Document) -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            id: document.id,
            user_id: document.user_id,
            document_type: document.document_type_id,
            document_type_name: document.document_type_display_name,
            original_filename: document.original_filename,
            file_size: document.file_size,
            issue_date: document.issue_date,
            expiry_date: document.expiry_date,
            document_number: document.document_number,
            issuing_authority: document.issuing_authority,
            status: document.status,
            notes: document.notes,
            reviewed_by: document.reviewed_by,
            reviewed_at: document.reviewed_at,
            uploaded_at: document.uploaded_at,
            updated_at: document.updated_at,
            days_until_expiry: days_until_expiry(document.expiry_date, today),
            is_expired: is_expired(document.expiry_date, today),
            is_expiring_soon: is_expiring_soon(document.expiry_date, today),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressDto {
    pub id: i32,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub current_stage: Stage,
    pub completion_percentage: i32,
    pub personal_details_completed_at: Option<String>,
    pub documents_uploaded_at: Option<String>,
    pub admin_approved_at: Option<String>,
    pub completed_at: Option<String>,
    pub admin_notes: Option<String>,
    pub rejected_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Progress> for ProgressDto {
    fn from(progress: Progress) -> Self {
        Self {
            id: progress.id,
            user_id: progress.user_id,
            user_name: None,
            user_email: None,
            current_stage: progress.current_stage,
            completion_percentage: progress.completion_percentage,
            personal_details_completed_at: progress.personal_details_completed_at,
            documents_uploaded_at: progress.documents_uploaded_at,
            admin_approved_at: progress.admin_approved_at,
            completed_at: progress.completed_at,
            admin_notes: progress.admin_notes,
            rejected_reason: progress.rejected_reason,
            created_at: progress.created_at,
            updated_at: progress.updated_at,
        }
    }
}

impl From<ProgressWithUser> for ProgressDto {
    fn from(row: ProgressWithUser) -> Self {
        let mut dto = Self::from(row.progress);
        dto.user_name = Some(row.user_name);
        dto.user_email = Some(row.user_email);
        dto
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub personal_details: Option<PersonalDetailsDto>,
    pub progress: ProgressDto,
    pub documents: Vec<DocumentDto>,
    pub required_document_types: Vec<DocumentTypeDto>,
    pub missing_documents: Vec<String>,
}

/// Full-replacement payload for `PUT /personal-details`. Absent fields
/// clear their columns.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PersonalDetailsRequest {
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub abn_number: Option<String>,
    pub tfn_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub bank_bsb: Option<String>,
    pub bank_account_number: Option<String>,
}
