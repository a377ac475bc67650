pub mod enums;
pub mod habit_rules;
pub mod habits;
pub mod iam;
pub mod pagination;
pub mod permissions;
pub mod reminders;
pub mod user_telegrams;
pub mod users;
pub mod validation;
