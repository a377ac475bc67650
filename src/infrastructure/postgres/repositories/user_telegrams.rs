use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::user_telegrams::{
            EditUserTelegramEntity, InsertUserTelegramEntity, UserTelegramEntity,
        },
        repositories::user_telegrams::UserTelegramRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::map_unique_violation,
        schema::user_telegrams,
    },
};

pub struct UserTelegramPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserTelegramPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserTelegramRepository for UserTelegramPostgres {
    async fn create(
        &self,
        insert_user_telegram_entity: InsertUserTelegramEntity,
    ) -> Result<UserTelegramEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(user_telegrams::table)
            .values(&insert_user_telegram_entity)
            .returning(UserTelegramEntity::as_returning())
            .get_result::<UserTelegramEntity>(&mut conn)
            .map_err(map_unique_violation)?;

        Ok(result)
    }

    async fn find_by_id(&self, profile_id: i64) -> Result<Option<UserTelegramEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = user_telegrams::table
            .find(profile_id)
            .select(UserTelegramEntity::as_select())
            .first::<UserTelegramEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserTelegramEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = user_telegrams::table
            .filter(user_telegrams::user_id.eq(user_id))
            .select(UserTelegramEntity::as_select())
            .first::<UserTelegramEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_chat_id(&self, chat_id: &str) -> Result<Option<UserTelegramEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = user_telegrams::table
            .filter(user_telegrams::chat_id.eq(chat_id))
            .select(UserTelegramEntity::as_select())
            .first::<UserTelegramEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update(
        &self,
        profile_id: i64,
        edit_user_telegram_entity: EditUserTelegramEntity,
    ) -> Result<UserTelegramEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(user_telegrams::table.find(profile_id))
            .set(&edit_user_telegram_entity)
            .returning(UserTelegramEntity::as_returning())
            .get_result::<UserTelegramEntity>(&mut conn)
            .map_err(map_unique_violation)?;

        Ok(result)
    }

    async fn delete(&self, profile_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(user_telegrams::table.find(profile_id)).execute(&mut conn)?;

        Ok(())
    }
}
