use sea_orm::entity::prelude::*;

/// Static reference data seeded by `vettra seed-types`. `name` is the
/// stable machine identifier; everything else is presentation or policy.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "document_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub display_name: String,

    pub description: Option<String>,

    pub is_required: bool,

    pub has_expiry: bool,

    pub max_file_size_mb: i32,

    /// Comma-separated list of allowed file extensions
    pub allowed_extensions: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
