use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::users;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserEntity {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub motivation: Option<String>,
    pub timezone: String,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = users)]
pub struct RegisterUserEntity {
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub timezone: String,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// `None` leaves a column untouched, `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = users)]
pub struct EditUserEntity {
    pub avatar: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub motivation: Option<Option<String>>,
    pub timezone: Option<String>,
    pub last_active: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl EditUserEntity {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
