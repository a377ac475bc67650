use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::{
    application::errors::{AppError, AppResult},
    config::config_model::Pagination,
    domain::{
        entities::users::{EditUserEntity, UserEntity},
        repositories::users::UserRepository,
        value_objects::{
            iam::AuthUser,
            pagination::{Page, PageRequest, PaginationQuery},
            users::{UpdateProfileModel, UserModel},
        },
    },
};

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    user_repository: Arc<U>,
    pagination: Pagination,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repository: Arc<U>, pagination: Pagination) -> Self {
        Self {
            user_repository,
            pagination,
        }
    }

    /// Staff see every user, everyone else only themselves.
    pub async fn list(
        &self,
        auth_user: &AuthUser,
        query: PaginationQuery,
    ) -> AppResult<Page<UserModel>> {
        let page_request = PageRequest::resolve(&query, &self.pagination);

        let (users, count) = if auth_user.is_staff {
            self.user_repository.list(&page_request).await?
        } else {
            let me = self.current_entity(auth_user).await?;
            (vec![me], 1)
        };

        Page::new(users, count, &page_request)
            .map(|page| page.map(UserModel::from))
            .ok_or_else(|| AppError::NotFound("Invalid page.".to_string()))
    }

    pub async fn retrieve(&self, auth_user: &AuthUser, user_id: i64) -> AppResult<UserModel> {
        if !auth_user.is_staff && auth_user.user_id != user_id {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(UserModel::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn current(&self, auth_user: &AuthUser) -> AppResult<UserModel> {
        Ok(self.current_entity(auth_user).await?.into())
    }

    pub async fn update_profile(
        &self,
        auth_user: &AuthUser,
        update_profile_model: UpdateProfileModel,
    ) -> AppResult<UserModel> {
        update_profile_model.validate()?;

        let edit_user_entity = update_profile_model.to_entity();
        if edit_user_entity.is_empty() {
            return self.current(auth_user).await;
        }

        let user = self
            .user_repository
            .update(auth_user.user_id, edit_user_entity)
            .await?;

        info!(user_id = user.id, "users: profile updated");
        Ok(user.into())
    }

    /// Soft delete: the account stays in place but can no longer log in.
    pub async fn deactivate(&self, auth_user: &AuthUser) -> AppResult<()> {
        self.user_repository
            .update(
                auth_user.user_id,
                EditUserEntity {
                    is_active: Some(false),
                    last_active: Some(Utc::now()),
                    ..EditUserEntity::default()
                },
            )
            .await?;

        info!(user_id = auth_user.user_id, "users: account deactivated");
        Ok(())
    }

    async fn current_entity(&self, auth_user: &AuthUser) -> AppResult<UserEntity> {
        self.user_repository
            .find_by_id(auth_user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
