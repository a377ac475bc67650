use anyhow::{Result, anyhow};
use tokio::sync::mpsc;

use crate::application::interfaces::reminders::ReminderQueue;

/// Bounded in-process queue between the reminder check and the delivery workers.
#[derive(Clone)]
pub struct ChannelReminderQueue {
    tx: mpsc::Sender<i64>,
}

pub fn channel(capacity: usize) -> (ChannelReminderQueue, mpsc::Receiver<i64>) {
    let (tx, rx) = mpsc::channel::<i64>(capacity);
    (ChannelReminderQueue { tx }, rx)
}

impl ReminderQueue for ChannelReminderQueue {
    fn enqueue(&self, habit_id: i64) -> Result<()> {
        match self.tx.try_send(habit_id) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(anyhow!("reminder queue is full")),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(anyhow!("reminder queue is closed")),
        }
    }
}
