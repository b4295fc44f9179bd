use sea_orm::entity::prelude::*;

/// Cached result of the stage/percentage derivation. Lazily created on
/// first access and rewritten after every personal-details or document
/// mutation; never an independent source of truth.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "onboarding_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,

    /// One of: not_started, personal_details, documents_upload,
    /// admin_review, completed, rejected
    pub current_stage: String,

    pub completion_percentage: i32,

    pub personal_details_completed_at: Option<String>,

    pub documents_uploaded_at: Option<String>,

    pub admin_approved_at: Option<String>,

    /// Set once on the first transition into `completed`
    pub completed_at: Option<String>,

    pub admin_notes: Option<String>,

    pub rejected_reason: Option<String>,

    pub created_at: String,

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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
