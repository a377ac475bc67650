use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// Hands a due habit over to the delivery workers without waiting for delivery.
#[automock]
pub trait ReminderQueue {
    fn enqueue(&self, habit_id: i64) -> Result<()>;
}

#[automock]
#[async_trait]
pub trait ReminderNotifier {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}
