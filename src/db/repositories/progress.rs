use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::Stage;
use crate::entities::{onboarding_progress, users};

/// Onboarding progress row as used by services and handlers.
#[derive(Debug, Clone)]
pub struct Progress {
    pub id: i32,
    pub user_id: i32,
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

impl From<onboarding_progress::Model> for Progress {
    fn from(model: onboarding_progress::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            current_stage: Stage::parse(&model.current_stage).unwrap_or(Stage::NotStarted),
            completion_percentage: model.completion_percentage,
            personal_details_completed_at: model.personal_details_completed_at,
            documents_uploaded_at: model.documents_uploaded_at,
            admin_approved_at: model.admin_approved_at,
            completed_at: model.completed_at,
            admin_notes: model.admin_notes,
            rejected_reason: model.rejected_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Progress joined with the owning account, for admin listings.
#[derive(Debug, Clone)]
pub struct ProgressWithUser {
    pub progress: Progress,
    pub user_name: String,
    pub user_email: String,
}

pub struct ProgressRepository {
    conn: DatabaseConnection,
}

impl ProgressRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_user(&self, user_id: i32) -> Result<Option<Progress>> {
        let row = onboarding_progress::Entity::find()
            .filter(onboarding_progress::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query onboarding progress")?;

        Ok(row.map(Progress::from))
    }

    /// Missing rows are not an error: a `not_started` row is created on
    /// first access.
    pub async fn get_or_create(&self, user_id: i32) -> Result<Progress> {
        if let Some(existing) = self.get_by_user(user_id).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let active = onboarding_progress::ActiveModel {
            user_id: Set(user_id),
            current_stage: Set(Stage::NotStarted.as_str().to_string()),
            completion_percentage: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to create onboarding progress")?;

        Ok(Progress::from(model))
    }

    /// Writes a freshly derived stage and percentage back to the cache
    /// row. `completed_at` (and `admin_approved_at`) are stamped exactly
    /// once, on the first transition into `completed`.
    pub async fn store_derivation(
        &self,
        user_id: i32,
        stage: Stage,
        completion_percentage: i32,
    ) -> Result<Progress> {
        // Ensure the row exists before loading the raw model.
        self.get_or_create(user_id).await?;

        let model = onboarding_progress::Entity::find()
            .filter(onboarding_progress::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Progress row vanished for user {user_id}"))?;

        let now = chrono::Utc::now().to_rfc3339();
        let stamp_completion = stage == Stage::Completed && model.completed_at.is_none();
        let stamp_approval = stage == Stage::Completed && model.admin_approved_at.is_none();

        let mut active: onboarding_progress::ActiveModel = model.into();
        active.current_stage = Set(stage.as_str().to_string());
        active.completion_percentage = Set(completion_percentage);
        if stamp_completion {
            active.completed_at = Set(Some(now.clone()));
        }
        if stamp_approval {
            active.admin_approved_at = Set(Some(now.clone()));
        }
        active.updated_at = Set(now);

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to store derived progress")?;

        Ok(Progress::from(model))
    }

    /// Stamps the personal-details milestone if it has not been set yet.
    pub async fn mark_personal_details_complete(&self, user_id: i32) -> Result<()> {
        self.mark_milestone(user_id, onboarding_progress::Column::PersonalDetailsCompletedAt)
            .await
    }

    /// Stamps the first-upload milestone if it has not been set yet.
    pub async fn mark_documents_uploaded(&self, user_id: i32) -> Result<()> {
        self.mark_milestone(user_id, onboarding_progress::Column::DocumentsUploadedAt)
            .await
    }

    async fn mark_milestone(
        &self,
        user_id: i32,
        column: onboarding_progress::Column,
    ) -> Result<()> {
        self.get_or_create(user_id).await?;

        let now = chrono::Utc::now().to_rfc3339();
        onboarding_progress::Entity::update_many()
            .col_expr(column, sea_orm::sea_query::Expr::value(now))
            .filter(onboarding_progress::Column::UserId.eq(user_id))
            .filter(column.is_null())
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// All users' progress, newest activity first, for the admin overview.
    pub async fn list_with_users(&self, stage: Option<Stage>) -> Result<Vec<ProgressWithUser>> {
        let mut query = onboarding_progress::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(onboarding_progress::Column::UpdatedAt);

        if let Some(stage) = stage {
            query = query.filter(onboarding_progress::Column::CurrentStage.eq(stage.as_str()));
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list onboarding progress")?;

        Ok(rows
            .into_iter()
            .map(|(model, user)| {
                let (user_name, user_email) = user.map_or_else(
                    || (String::new(), String::new()),
                    |u| {
                        let name = format!("{} {}", u.first_name, u.last_name);
                        let name = name.trim().to_string();
                        (
                            if name.is_empty() { u.username } else { name },
                            u.email,
                        )
                    },
                );
                ProgressWithUser {
                    progress: Progress::from(model),
                    user_name,
                    user_email,
                }
            })
            .collect())
    }
}
