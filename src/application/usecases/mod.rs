pub mod habits;
pub mod iam;
pub mod reminders;
pub mod user_telegrams;
pub mod users;
