use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::user_telegrams::{
    EditUserTelegramEntity, InsertUserTelegramEntity, UserTelegramEntity,
};

pub const USER_ID_UNIQUE: &str = "user_telegrams_user_id_key";
pub const CHAT_ID_UNIQUE: &str = "user_telegrams_chat_id_key";

#[automock]
#[async_trait]
pub trait UserTelegramRepository {
    async fn create(
        &self,
        insert_user_telegram_entity: InsertUserTelegramEntity,
    ) -> Result<UserTelegramEntity>;
    async fn find_by_id(&self, profile_id: i64) -> Result<Option<UserTelegramEntity>>;
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserTelegramEntity>>;
    async fn find_by_chat_id(&self, chat_id: &str) -> Result<Option<UserTelegramEntity>>;
    async fn update(
        &self,
        profile_id: i64,
        edit_user_telegram_entity: EditUserTelegramEntity,
    ) -> Result<UserTelegramEntity>;
    async fn delete(&self, profile_id: i64) -> Result<()>;
}
