use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::habits;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = habits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HabitEntity {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub time: NaiveTime,
    pub place: String,
    pub periodicity: i16,
    pub reward: Option<String>,
    pub related_habit_id: Option<i64>,
    pub is_pleasant: bool,
    pub duration: i16,
    pub is_public: bool,
    pub remind_at: Option<DateTime<Utc>>,
    pub repeat: String,
    pub last_reminded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A habit row joined with its owner's email.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitRecord {
    pub habit: HabitEntity,
    pub owner_email: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = habits)]
pub struct InsertHabitEntity {
    pub user_id: i64,
    pub action: String,
    pub time: NaiveTime,
    pub place: String,
    pub periodicity: i16,
    pub reward: Option<String>,
    pub related_habit_id: Option<i64>,
    pub is_pleasant: bool,
    pub duration: i16,
    pub is_public: bool,
    pub remind_at: Option<DateTime<Utc>>,
    pub repeat: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the user-editable columns; `last_reminded_at` is owned by the reminder check.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = habits)]
#[diesel(treat_none_as_null = true)]
pub struct EditHabitEntity {
    pub action: String,
    pub time: NaiveTime,
    pub place: String,
    pub periodicity: i16,
    pub reward: Option<String>,
    pub related_habit_id: Option<i64>,
    pub is_pleasant: bool,
    pub duration: i16,
    pub is_public: bool,
    pub remind_at: Option<DateTime<Utc>>,
    pub repeat: String,
    pub updated_at: DateTime<Utc>,
}
