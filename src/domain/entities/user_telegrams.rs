use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::user_telegrams;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = user_telegrams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserTelegramEntity {
    pub id: i64,
    pub user_id: i64,
    pub chat_id: String,
    pub telegram_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = user_telegrams)]
pub struct InsertUserTelegramEntity {
    pub user_id: i64,
    pub chat_id: String,
    pub telegram_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = user_telegrams)]
#[diesel(treat_none_as_null = true)]
pub struct EditUserTelegramEntity {
    pub chat_id: String,
    pub telegram_username: Option<String>,
}
