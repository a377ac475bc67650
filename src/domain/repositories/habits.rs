use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::{
    entities::habits::{EditHabitEntity, HabitEntity, HabitRecord, InsertHabitEntity},
    value_objects::pagination::PageRequest,
};

#[automock]
#[async_trait]
pub trait HabitRepository {
    async fn create(&self, insert_habit_entity: InsertHabitEntity) -> Result<HabitRecord>;
    async fn find_by_id(&self, habit_id: i64) -> Result<Option<HabitRecord>>;
    /// Replaces the editable columns; `reset_last_reminded` also clears `last_reminded_at`.
    async fn update(
        &self,
        habit_id: i64,
        edit_habit_entity: EditHabitEntity,
        reset_last_reminded: bool,
    ) -> Result<HabitRecord>;
    async fn delete(&self, habit_id: i64) -> Result<()>;
    /// Whether any habit links to `habit_id` as its related habit.
    async fn is_referenced_as_related(&self, habit_id: i64) -> Result<bool>;
    async fn list_by_owner(
        &self,
        user_id: i64,
        page_request: &PageRequest,
    ) -> Result<(Vec<HabitRecord>, i64)>;
    async fn list_public(&self, page_request: &PageRequest) -> Result<(Vec<HabitRecord>, i64)>;
    async fn list_with_reminders(&self) -> Result<Vec<HabitEntity>>;
    /// Advances `last_reminded_at` only if it still equals `previous`. Returns whether the row changed.
    async fn mark_reminded(
        &self,
        habit_id: i64,
        previous: Option<DateTime<Utc>>,
        reminded_at: DateTime<Utc>,
    ) -> Result<bool>;
}
