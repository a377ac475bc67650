use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::habits::{EditHabitEntity, HabitEntity, HabitRecord, InsertHabitEntity},
        repositories::habits::HabitRepository,
        value_objects::pagination::PageRequest,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{habits, users},
    },
};

pub struct HabitPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl HabitPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn load_record(conn: &mut PgConnection, habit_id: i64) -> QueryResult<HabitRecord> {
        habits::table
            .inner_join(users::table)
            .filter(habits::id.eq(habit_id))
            .select((HabitEntity::as_select(), users::email))
            .first::<(HabitEntity, String)>(conn)
            .map(into_record)
    }
}

fn into_record((habit, owner_email): (HabitEntity, String)) -> HabitRecord {
    HabitRecord { habit, owner_email }
}

#[async_trait]
impl HabitRepository for HabitPostgres {
    async fn create(&self, insert_habit_entity: InsertHabitEntity) -> Result<HabitRecord> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let habit_id = insert_into(habits::table)
            .values(&insert_habit_entity)
            .returning(habits::id)
            .get_result::<i64>(&mut conn)?;

        Ok(Self::load_record(&mut conn, habit_id)?)
    }

    async fn find_by_id(&self, habit_id: i64) -> Result<Option<HabitRecord>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = Self::load_record(&mut conn, habit_id).optional()?;

        Ok(result)
    }

    async fn update(
        &self,
        habit_id: i64,
        edit_habit_entity: EditHabitEntity,
        reset_last_reminded: bool,
    ) -> Result<HabitRecord> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<_, anyhow::Error, _>(|conn| {
            let target = habits::table.find(habit_id);
            if reset_last_reminded {
                update(target)
                    .set((
                        &edit_habit_entity,
                        habits::last_reminded_at.eq(None::<DateTime<Utc>>),
                    ))
                    .execute(conn)?;
            } else {
                update(target).set(&edit_habit_entity).execute(conn)?;
            }

            Ok(Self::load_record(conn, habit_id)?)
        })?;

        Ok(result)
    }

    async fn delete(&self, habit_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(habits::table.find(habit_id)).execute(&mut conn)?;

        Ok(())
    }

    async fn is_referenced_as_related(&self, habit_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let referenced = diesel::select(diesel::dsl::exists(
            habits::table.filter(habits::related_habit_id.eq(habit_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(referenced)
    }

    async fn list_by_owner(
        &self,
        user_id: i64,
        page_request: &PageRequest,
    ) -> Result<(Vec<HabitRecord>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = habits::table
            .filter(habits::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = habits::table
            .inner_join(users::table)
            .filter(habits::user_id.eq(user_id))
            .select((HabitEntity::as_select(), users::email))
            .order(habits::id.asc())
            .limit(page_request.limit())
            .offset(page_request.offset())
            .load::<(HabitEntity, String)>(&mut conn)?;

        Ok((results.into_iter().map(into_record).collect(), count))
    }

    async fn list_public(&self, page_request: &PageRequest) -> Result<(Vec<HabitRecord>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = habits::table
            .filter(habits::is_public.eq(true))
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = habits::table
            .inner_join(users::table)
            .filter(habits::is_public.eq(true))
            .select((HabitEntity::as_select(), users::email))
            .order(habits::id.asc())
            .limit(page_request.limit())
            .offset(page_request.offset())
            .load::<(HabitEntity, String)>(&mut conn)?;

        Ok((results.into_iter().map(into_record).collect(), count))
    }

    async fn list_with_reminders(&self) -> Result<Vec<HabitEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = habits::table
            .filter(habits::remind_at.is_not_null())
            .select(HabitEntity::as_select())
            .order(habits::remind_at.asc())
            .load::<HabitEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_reminded(
        &self,
        habit_id: i64,
        previous: Option<DateTime<Utc>>,
        reminded_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let target = habits::table.filter(habits::id.eq(habit_id));
        let changed = match previous {
            Some(previous) => update(target.filter(habits::last_reminded_at.eq(previous)))
                .set(habits::last_reminded_at.eq(Some(reminded_at)))
                .execute(&mut conn)?,
            None => update(target.filter(habits::last_reminded_at.is_null()))
                .set(habits::last_reminded_at.eq(Some(reminded_at)))
                .execute(&mut conn)?,
        };

        Ok(changed == 1)
    }
}
