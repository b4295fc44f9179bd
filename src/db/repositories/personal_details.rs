use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::personal_details;

/// Personal details row as used by services and handlers.
#[derive(Debug, Clone, Default)]
pub struct PersonalDetails {
    pub id: i32,
    pub user_id: i32,
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

impl PersonalDetails {
    /// Whether every field in the required subset is filled in. The
    /// professional and banking fields are optional for completeness.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.date_of_birth,
            &self.phone_number,
            &self.address_line1,
            &self.suburb,
            &self.state,
            &self.postcode,
            &self.emergency_contact_name,
            &self.emergency_contact_phone,
        ]
        .into_iter()
        .all(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

impl From<personal_details::Model> for PersonalDetails {
    fn from(model: personal_details::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            date_of_birth: model.date_of_birth,
            phone_number: model.phone_number,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            suburb: model.suburb,
            state: model.state,
            postcode: model.postcode,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_phone: model.emergency_contact_phone,
            emergency_contact_relationship: model.emergency_contact_relationship,
            abn_number: model.abn_number,
            tfn_number: model.tfn_number,
            bank_account_name: model.bank_account_name,
            bank_bsb: model.bank_bsb,
            bank_account_number: model.bank_account_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Full replacement payload for a PUT. Absent fields clear their columns.
#[derive(Debug, Clone, Default)]
pub struct PersonalDetailsUpdate {
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

pub struct PersonalDetailsRepository {
    conn: DatabaseConnection,
}

impl PersonalDetailsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_user(&self, user_id: i32) -> Result<Option<PersonalDetails>> {
        let row = personal_details::Entity::find()
            .filter(personal_details::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query personal details")?;

        Ok(row.map(PersonalDetails::from))
    }

    /// Missing rows are not an error: an empty record is created on first
    /// access.
    pub async fn get_or_create(&self, user_id: i32) -> Result<PersonalDetails> {
        if let Some(existing) = self.get_by_user(user_id).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let active = personal_details::ActiveModel {
            user_id: Set(user_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to create personal details")?;

        Ok(PersonalDetails::from(model))
    }

    /// Replaces every data field with the payload's values.
    pub async fn update(
        &self,
        user_id: i32,
        update: PersonalDetailsUpdate,
    ) -> Result<PersonalDetails> {
        // Ensure the row exists before converting to an ActiveModel.
        let current = self.get_or_create(user_id).await?;

        let model = personal_details::Entity::find_by_id(current.id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Personal details row vanished for user {user_id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: personal_details::ActiveModel = model.into();
        active.date_of_birth = Set(update.date_of_birth);
        active.phone_number = Set(update.phone_number);
        active.address_line1 = Set(update.address_line1);
        active.address_line2 = Set(update.address_line2);
        active.suburb = Set(update.suburb);
        active.state = Set(update.state);
        active.postcode = Set(update.postcode);
        active.emergency_contact_name = Set(update.emergency_contact_name);
        active.emergency_contact_phone = Set(update.emergency_contact_phone);
        active.emergency_contact_relationship = Set(update.emergency_contact_relationship);
        active.abn_number = Set(update.abn_number);
        active.tfn_number = Set(update.tfn_number);
        active.bank_account_name = Set(update.bank_account_name);
        active.bank_bsb = Set(update.bank_bsb);
        active.bank_account_number = Set(update.bank_account_number);
        active.updated_at = Set(now);

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update personal details")?;

        Ok(PersonalDetails::from(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PersonalDetails {
        PersonalDetails {
            date_of_birth: Some("1990-04-02".to_string()),
            phone_number: Some("+61412345678".to_string()),
            address_line1: Some("1 Example St".to_string()),
            suburb: Some("Brisbane".to_string()),
            state: Some("QLD".to_string()),
            postcode: Some("4000".to_string()),
            emergency_contact_name: Some("Jordan Smith".to_string()),
            emergency_contact_phone: Some("+61498765432".to_string()),
            ..PersonalDetails::default()
        }
    }

    #[test]
    fn test_complete_when_required_subset_filled() {
        assert!(filled().is_complete());
    }

    #[test]
    fn test_incomplete_without_phone() {
        let mut details = filled();
        details.phone_number = None;
        assert!(!details.is_complete());
    }

    #[test]
    fn test_whitespace_only_field_does_not_count() {
        let mut details = filled();
        details.suburb = Some("   ".to_string());
        assert!(!details.is_complete());
    }

    #[test]
    fn test_banking_fields_not_required() {
        let details = filled();
        assert!(details.bank_account_number.is_none());
        assert!(details.is_complete());
    }
}
