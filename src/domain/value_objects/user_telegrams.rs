use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::user_telegrams::{
        EditUserTelegramEntity, InsertUserTelegramEntity, UserTelegramEntity,
    },
    value_objects::validation::{blank_to_none, deserialize_some},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserTelegramModel {
    pub id: i64,
    pub user: i64,
    pub chat_id: String,
    pub telegram_username: Option<String>,
}

impl From<UserTelegramEntity> for UserTelegramModel {
    fn from(entity: UserTelegramEntity) -> Self {
        Self {
            id: entity.id,
            user: entity.user_id,
            chat_id: entity.chat_id,
            telegram_username: entity.telegram_username,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct UpsertUserTelegramModel {
    #[validate(length(min = 1, max = 64, message = "Chat id must be 1 to 64 characters."))]
    pub chat_id: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub telegram_username: Option<String>,
}

impl UpsertUserTelegramModel {
    pub fn to_insert_entity(&self, user_id: i64) -> InsertUserTelegramEntity {
        InsertUserTelegramEntity {
            user_id,
            chat_id: self.chat_id.trim().to_string(),
            telegram_username: blank_to_none(self.telegram_username.clone()),
            created_at: Utc::now(),
        }
    }

    pub fn to_edit_entity(&self) -> EditUserTelegramEntity {
        EditUserTelegramEntity {
            chat_id: self.chat_id.trim().to_string(),
            telegram_username: blank_to_none(self.telegram_username.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatchUserTelegramModel {
    pub chat_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub telegram_username: Option<Option<String>>,
}

impl PatchUserTelegramModel {
    pub fn apply_to(self, current: &UserTelegramEntity) -> UpsertUserTelegramModel {
        UpsertUserTelegramModel {
            chat_id: self.chat_id.unwrap_or_else(|| current.chat_id.clone()),
            telegram_username: self
                .telegram_username
                .unwrap_or_else(|| current.telegram_username.clone()),
        }
    }
}
