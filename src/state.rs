use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, DocumentService, OnboardingService, SeaOrmAuthService, SeaOrmDocumentService,
    SeaOrmOnboardingService,
};
use crate::storage::DocumentStorage;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub storage: DocumentStorage,

    pub auth_service: Arc<dyn AuthService>,

    pub onboarding_service: Arc<dyn OnboardingService>,

    pub document_service: Arc<dyn DocumentService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let storage = DocumentStorage::new(&config.storage.upload_path);
        storage.ensure_exists().await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let onboarding_service =
            Arc::new(SeaOrmOnboardingService::new(store.clone())) as Arc<dyn OnboardingService>;

        let document_service = Arc::new(SeaOrmDocumentService::new(
            store.clone(),
            storage.clone(),
            onboarding_service.clone(),
        )) as Arc<dyn DocumentService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            storage,
            auth_service,
            onboarding_service,
            document_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
