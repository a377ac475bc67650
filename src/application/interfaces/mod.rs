pub mod reminders;
pub mod security;
