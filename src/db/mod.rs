use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{DocumentStatus, Stage};

pub mod migrator;
pub mod repositories;
pub mod seed;

pub use repositories::document::{Document, NewDocument, RequiredDocCounts};
pub use repositories::document_type::DocumentType;
pub use repositories::personal_details::{PersonalDetails, PersonalDetailsUpdate};
pub use repositories::progress::{Progress, ProgressWithUser};
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn personal_details_repo(&self) -> repositories::personal_details::PersonalDetailsRepository {
        repositories::personal_details::PersonalDetailsRepository::new(self.conn.clone())
    }

    fn document_type_repo(&self) -> repositories::document_type::DocumentTypeRepository {
        repositories::document_type::DocumentTypeRepository::new(self.conn.clone())
    }

    fn document_repo(&self) -> repositories::document::DocumentRepository {
        repositories::document::DocumentRepository::new(self.conn.clone())
    }

    fn progress_repo(&self) -> repositories::progress::ProgressRepository {
        repositories::progress::ProgressRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        new_user: NewUser,
        security: Option<&SecurityConfig>,
    ) -> Result<User> {
        self.user_repo().create(new_user, security).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_password(
        &self,
        user_id: i32,
        new_password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(user_id, new_password, security)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    // ========================================================================
    // Personal details
    // ========================================================================

    pub async fn get_personal_details(&self, user_id: i32) -> Result<Option<PersonalDetails>> {
        self.personal_details_repo().get_by_user(user_id).await
    }

    pub async fn get_or_create_personal_details(&self, user_id: i32) -> Result<PersonalDetails> {
        self.personal_details_repo().get_or_create(user_id).await
    }

    pub async fn update_personal_details(
        &self,
        user_id: i32,
        update: PersonalDetailsUpdate,
    ) -> Result<PersonalDetails> {
        self.personal_details_repo().update(user_id, update).await
    }

    // ========================================================================
    // Document types
    // ========================================================================

    pub async fn list_document_types(&self) -> Result<Vec<DocumentType>> {
        self.document_type_repo().list_all().await
    }

    pub async fn list_required_document_types(&self) -> Result<Vec<DocumentType>> {
        self.document_type_repo().list_required().await
    }

    pub async fn count_required_document_types(&self) -> Result<u64> {
        self.document_type_repo().count_required().await
    }

    pub async fn get_document_type(&self, id: i32) -> Result<Option<DocumentType>> {
        self.document_type_repo().get_by_id(id).await
    }

    // ========================================================================
    // Documents
    // ========================================================================

    pub async fn get_document(&self, id: i32) -> Result<Option<Document>> {
        self.document_repo().get(id).await
    }

    pub async fn list_documents_for_user(&self, user_id: i32) -> Result<Vec<Document>> {
        self.document_repo().list_for_user(user_id).await
    }

    pub async fn replace_document(
        &self,
        new: NewDocument,
        today: NaiveDate,
    ) -> Result<(i32, Option<String>)> {
        self.document_repo().replace_for_type(new, today).await
    }

    pub async fn delete_document(&self, id: i32) -> Result<Option<String>> {
        self.document_repo().delete(id).await
    }

    pub async fn review_document(
        &self,
        id: i32,
        verdict: DocumentStatus,
        notes: Option<String>,
        reviewer_id: i32,
        today: NaiveDate,
    ) -> Result<Option<Document>> {
        self.document_repo()
            .review(id, verdict, notes, reviewer_id, today)
            .await
    }

    pub async fn list_pending_documents(&self) -> Result<Vec<Document>> {
        self.document_repo().list_pending().await
    }

    pub async fn list_expiring_documents(&self, threshold: NaiveDate) -> Result<Vec<Document>> {
        self.document_repo().list_expiring(threshold).await
    }

    pub async fn required_doc_counts(&self, user_id: i32) -> Result<RequiredDocCounts> {
        self.document_repo().required_counts(user_id).await
    }

    pub async fn list_all_document_models(
        &self,
    ) -> Result<Vec<crate::entities::documents::Model>> {
        self.document_repo().list_all_models().await
    }

    pub async fn update_document_file_metadata(
        &self,
        id: i32,
        original_filename: String,
        file_size: i64,
    ) -> Result<()> {
        self.document_repo()
            .update_file_metadata(id, original_filename, file_size)
            .await
    }

    // ========================================================================
    // Onboarding progress
    // ========================================================================

    pub async fn get_or_create_progress(&self, user_id: i32) -> Result<Progress> {
        self.progress_repo().get_or_create(user_id).await
    }

    pub async fn store_progress_derivation(
        &self,
        user_id: i32,
        stage: Stage,
        completion_percentage: i32,
    ) -> Result<Progress> {
        self.progress_repo()
            .store_derivation(user_id, stage, completion_percentage)
            .await
    }

    pub async fn mark_personal_details_complete(&self, user_id: i32) -> Result<()> {
        self.progress_repo()
            .mark_personal_details_complete(user_id)
            .await
    }

    pub async fn mark_documents_uploaded(&self, user_id: i32) -> Result<()> {
        self.progress_repo().mark_documents_uploaded(user_id).await
    }

    pub async fn list_progress_with_users(
        &self,
        stage: Option<Stage>,
    ) -> Result<Vec<ProgressWithUser>> {
        self.progress_repo().list_with_users(stage).await
    }
}
