//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store, User};
use crate::domain::Role;
use crate::services::auth_service::{AuthError, AuthService, RegisterRequest};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        if self.store.get_user_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        if self
            .store
            .get_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        let user = self
            .store
            .create_user(
                NewUser {
                    email: request.email,
                    username: request.username,
                    password: request.password,
                    first_name: request.first_name,
                    last_name: request.last_name,
                    role: Role::Worker,
                },
                Some(&self.security),
            )
            .await?;

        tracing::info!("Registered worker account {} ({})", user.username, user.email);

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let is_valid = self.store.verify_user_password(email, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(user)
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.filter(|u| u.is_active))
    }

    async fn current_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < 8 {
            return Err(AuthError::Validation(
                "New password must be at least 8 characters".to_string(),
            ));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let is_valid = self
            .store
            .verify_user_password(&user.email, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(user_id, new_password, Some(&self.security))
            .await?;

        tracing::info!("Password changed for user {}", user.username);

        Ok(())
    }
}
