use std::sync::Arc;

use tracing::{info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    application::errors::{AppError, AppResult},
    domain::{
        entities::user_telegrams::UserTelegramEntity,
        repositories::{
            errors::UniqueViolation,
            user_telegrams::{CHAT_ID_UNIQUE, USER_ID_UNIQUE, UserTelegramRepository},
        },
        value_objects::{
            iam::AuthUser,
            permissions::is_profile_owner,
            user_telegrams::{PatchUserTelegramModel, UpsertUserTelegramModel, UserTelegramModel},
            validation::validation_error,
        },
    },
};

const PROFILE_NOT_FOUND: &str = "Telegram profile not found";

pub struct UserTelegramUseCase<T>
where
    T: UserTelegramRepository + Send + Sync,
{
    user_telegram_repository: Arc<T>,
}

impl<T> UserTelegramUseCase<T>
where
    T: UserTelegramRepository + Send + Sync,
{
    pub fn new(user_telegram_repository: Arc<T>) -> Self {
        Self {
            user_telegram_repository,
        }
    }

    pub async fn list(&self, auth_user: &AuthUser) -> AppResult<Vec<UserTelegramModel>> {
        Ok(self
            .user_telegram_repository
            .find_by_user_id(auth_user.user_id)
            .await?
            .into_iter()
            .map(UserTelegramModel::from)
            .collect())
    }

    pub async fn create(
        &self,
        auth_user: &AuthUser,
        upsert_model: UpsertUserTelegramModel,
    ) -> AppResult<UserTelegramModel> {
        self.check(&upsert_model, None).await?;

        if self
            .user_telegram_repository
            .find_by_user_id(auth_user.user_id)
            .await?
            .is_some()
        {
            return Err(profile_exists());
        }

        let profile = self
            .user_telegram_repository
            .create(upsert_model.to_insert_entity(auth_user.user_id))
            .await
            .map_err(unique_violation_to_app_error)?;

        info!(
            user_id = auth_user.user_id,
            profile_id = profile.id,
            "user_telegrams: profile linked"
        );
        Ok(profile.into())
    }

    pub async fn retrieve(&self, auth_user: &AuthUser, profile_id: i64) -> AppResult<UserTelegramModel> {
        Ok(self.owned_profile(auth_user, profile_id).await?.into())
    }

    pub async fn update(
        &self,
        auth_user: &AuthUser,
        profile_id: i64,
        upsert_model: UpsertUserTelegramModel,
    ) -> AppResult<UserTelegramModel> {
        let profile = self.owned_profile(auth_user, profile_id).await?;
        self.save(profile, upsert_model).await
    }

    pub async fn partial_update(
        &self,
        auth_user: &AuthUser,
        profile_id: i64,
        patch_model: PatchUserTelegramModel,
    ) -> AppResult<UserTelegramModel> {
        let profile = self.owned_profile(auth_user, profile_id).await?;
        let upsert_model = patch_model.apply_to(&profile);
        self.save(profile, upsert_model).await
    }

    pub async fn delete(&self, auth_user: &AuthUser, profile_id: i64) -> AppResult<()> {
        let profile = self.owned_profile(auth_user, profile_id).await?;
        self.user_telegram_repository.delete(profile.id).await?;

        info!(
            user_id = auth_user.user_id,
            profile_id, "user_telegrams: profile unlinked"
        );
        Ok(())
    }

    async fn save(
        &self,
        profile: UserTelegramEntity,
        upsert_model: UpsertUserTelegramModel,
    ) -> AppResult<UserTelegramModel> {
        self.check(&upsert_model, Some(profile.id)).await?;

        let updated = self
            .user_telegram_repository
            .update(profile.id, upsert_model.to_edit_entity())
            .await
            .map_err(unique_violation_to_app_error)?;

        Ok(updated.into())
    }

    /// Field rules plus chat id uniqueness across users.
    async fn check(
        &self,
        upsert_model: &UpsertUserTelegramModel,
        profile_id: Option<i64>,
    ) -> AppResult<()> {
        let mut errors = upsert_model
            .validate()
            .err()
            .unwrap_or_else(ValidationErrors::new);

        let chat_id = upsert_model.chat_id.trim();
        if chat_id.is_empty() {
            errors.add(
                "chat_id",
                validation_error("blank", "This field may not be blank."),
            );
        } else {
            let taken = self
                .user_telegram_repository
                .find_by_chat_id(chat_id)
                .await?
                .is_some_and(|existing| Some(existing.id) != profile_id);

            if taken {
                warn!(chat_id, "user_telegrams: chat id already linked");
                errors.add("chat_id", chat_id_taken());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    async fn owned_profile(&self, auth_user: &AuthUser, profile_id: i64) -> AppResult<UserTelegramEntity> {
        self.user_telegram_repository
            .find_by_id(profile_id)
            .await?
            .filter(|profile| is_profile_owner(auth_user.user_id, profile))
            .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))
    }
}

fn profile_exists() -> AppError {
    AppError::Conflict("Telegram profile already exists for this user".to_string())
}

fn chat_id_taken() -> ValidationError {
    validation_error(
        "chat_id_taken",
        "This chat id is already linked to another account.",
    )
}

/// Writes racing past `check` still answer as client errors.
fn unique_violation_to_app_error(err: anyhow::Error) -> AppError {
    match UniqueViolation::constraint_of(&err) {
        Some(USER_ID_UNIQUE) => profile_exists(),
        Some(CHAT_ID_UNIQUE) => {
            let mut errors = ValidationErrors::new();
            errors.add("chat_id", chat_id_taken());
            AppError::Validation(errors)
        }
        _ => AppError::from(err),
    }
}
