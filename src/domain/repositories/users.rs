use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::{
    entities::users::{EditUserEntity, RegisterUserEntity, UserEntity},
    value_objects::pagination::PageRequest,
};

pub const EMAIL_UNIQUE: &str = "users_email_key";

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn register(&self, register_user_entity: RegisterUserEntity) -> Result<UserEntity>;
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    async fn list(&self, page_request: &PageRequest) -> Result<(Vec<UserEntity>, i64)>;
    async fn update(&self, user_id: i64, edit_user_entity: EditUserEntity) -> Result<UserEntity>;
    async fn touch_last_active(&self, user_id: i64, at: DateTime<Utc>) -> Result<()>;
}
