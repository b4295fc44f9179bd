//! Default document-type catalog and its idempotent seeder.
//!
//! Shared by the initial migration and the `seed-types` CLI command, so a
//! fresh database is usable immediately and an operator can re-apply the
//! catalog after editing it.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

use crate::db::repositories::document_type::DocumentTypeSpec;
use crate::entities::document_types;

pub const DEFAULT_DOCUMENT_TYPES: &[DocumentTypeSpec] = &[
    DocumentTypeSpec {
        name: "yellow_card",
        display_name: "Yellow Card (Disability Worker Screening)",
        description: "Required disability worker screening clearance",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "police_check",
        display_name: "National Police Check",
        description: "Criminal history check from Australian Federal Police",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "ndis_orientation",
        display_name: "NDIS Orientation Certificate",
        description: "NDIS orientation module completion certificate",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "first_aid",
        display_name: "First Aid Certificate",
        description: "Current first aid training certificate",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "cpr_certificate",
        display_name: "CPR Certificate",
        description: "Cardiopulmonary resuscitation training certificate",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "public_liability",
        display_name: "Public Liability Insurance",
        description: "Public liability insurance policy document",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "professional_indemnity",
        display_name: "Professional Indemnity Insurance",
        description: "Professional indemnity insurance policy document",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "car_insurance",
        display_name: "Car Insurance",
        description: "Vehicle insurance policy (if using personal vehicle)",
        is_required: false,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "drivers_licence_front",
        display_name: "Driver's Licence (Front)",
        description: "Front side of current driver's licence",
        is_required: false,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "jpg,jpeg,png,pdf",
    },
    DocumentTypeSpec {
        name: "drivers_licence_back",
        display_name: "Driver's Licence (Back)",
        description: "Back side of current driver's licence",
        is_required: false,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "jpg,jpeg,png,pdf",
    },
    DocumentTypeSpec {
        name: "car_registration",
        display_name: "Car Registration",
        description: "Vehicle registration document (if using personal vehicle)",
        is_required: false,
        has_expiry: true,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "right_to_work",
        display_name: "Right to Work Check",
        description: "Document proving right to work in Australia",
        is_required: true,
        has_expiry: false,
        max_file_size_mb: 5,
        allowed_extensions: "pdf,jpg,jpeg,png",
    },
    DocumentTypeSpec {
        name: "service_agreement",
        display_name: "Signed Service Agreement",
        description: "Completed and signed service agreement document",
        is_required: true,
        has_expiry: true,
        max_file_size_mb: 10,
        allowed_extensions: "pdf",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedReport {
    pub created: usize,
    pub updated: usize,
}

/// Upserts the default catalog. The `name` column is the key and is never
/// rewritten; every other field is refreshed from the spec.
pub async fn seed_document_types<C: ConnectionTrait>(conn: &C) -> Result<SeedReport, DbErr> {
    let mut report = SeedReport::default();

    for spec in DEFAULT_DOCUMENT_TYPES {
        let existing = document_types::Entity::find()
            .filter(document_types::Column::Name.eq(spec.name))
            .one(conn)
            .await?;

        if let Some(model) = existing {
            let mut active: document_types::ActiveModel = model.into();
            active.display_name = Set(spec.display_name.to_string());
            active.description = Set(Some(spec.description.to_string()));
            active.is_required = Set(spec.is_required);
            active.has_expiry = Set(spec.has_expiry);
            active.max_file_size_mb = Set(spec.max_file_size_mb);
            active.allowed_extensions = Set(spec.allowed_extensions.to_string());
            active.update(conn).await?;
            report.updated += 1;
        } else {
            let active = document_types::ActiveModel {
                name: Set(spec.name.to_string()),
                display_name: Set(spec.display_name.to_string()),
                description: Set(Some(spec.description.to_string())),
                is_required: Set(spec.is_required),
                has_expiry: Set(spec.has_expiry),
                max_file_size_mb: Set(spec.max_file_size_mb),
                allowed_extensions: Set(spec.allowed_extensions.to_string()),
                created_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            };
            active.insert(conn).await?;
            report.created += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = DEFAULT_DOCUMENT_TYPES.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFAULT_DOCUMENT_TYPES.len());
    }

    #[test]
    fn test_nine_types_are_required() {
        let required = DEFAULT_DOCUMENT_TYPES.iter().filter(|s| s.is_required).count();
        assert_eq!(required, 9);
    }

    #[test]
    fn test_right_to_work_never_expires() {
        let rtw = DEFAULT_DOCUMENT_TYPES
            .iter()
            .find(|s| s.name == "right_to_work")
            .unwrap();
        assert!(!rtw.has_expiry);
    }
}
