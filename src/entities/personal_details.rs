use sea_orm::entity::prelude::*;

/// One-to-one extension of a user. All data fields are nullable: the row is
/// lazily created empty and filled in over several updates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personal_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,

    /// ISO date (YYYY-MM-DD)
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
