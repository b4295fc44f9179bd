use sea_orm::entity::prelude::*;

/// One uploaded compliance document. Unique per (user, document type);
/// the unique index is created by the initial migration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub document_type_id: i32,

    /// Blob path relative to the storage root
    pub stored_path: String,

    pub original_filename: String,

    /// File size in bytes
    pub file_size: i64,

    /// ISO date (YYYY-MM-DD)
    pub issue_date: Option<String>,

    /// ISO date (YYYY-MM-DD)
    pub expiry_date: Option<String>,

    pub document_number: Option<String>,

    pub issuing_authority: Option<String>,

    /// One of: pending, approved, rejected, expired, expiring_soon
    pub status: String,

    /// Admin notes or rejection reasons
    pub notes: Option<String>,

    pub reviewed_by: Option<i32>,

    pub reviewed_at: Option<String>,

    pub uploaded_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::document_types::Entity",
        from = "Column::DocumentTypeId",
        to = "super::document_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DocumentTypes,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Reviewer,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::document_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
