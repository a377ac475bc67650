use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::users::{EditUserEntity, RegisterUserEntity, UserEntity},
        repositories::users::UserRepository,
        value_objects::pagination::PageRequest,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::map_unique_violation, schema::users,
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn register(&self, register_user_entity: RegisterUserEntity) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(users::table)
            .values(&register_user_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .map_err(map_unique_violation)?;

        Ok(result)
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::email.eq(email))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, page_request: &PageRequest) -> Result<(Vec<UserEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = users::table.count().get_result::<i64>(&mut conn)?;

        let results = users::table
            .select(UserEntity::as_select())
            .order(users::id.asc())
            .limit(page_request.limit())
            .offset(page_request.offset())
            .load::<UserEntity>(&mut conn)?;

        Ok((results, count))
    }

    async fn update(&self, user_id: i64, edit_user_entity: EditUserEntity) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(users::table.find(user_id))
            .set(&edit_user_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)?;

        Ok(result)
    }

    async fn touch_last_active(&self, user_id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table.find(user_id))
            .set(users::last_active.eq(at))
            .execute(&mut conn)?;

        Ok(())
    }
}
