pub mod reminder_delivery;
pub mod reminder_queue;
pub mod reminder_scheduler;
