pub mod habits;
pub mod user_telegrams;
pub mod users;
