use std::sync::Arc;

use anyhow::Result;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinSet,
};
use tracing::{debug, error, info};

use crate::{
    application::{
        interfaces::reminders::ReminderNotifier, usecases::reminders::ReminderDeliveryUseCase,
    },
    domain::repositories::{habits::HabitRepository, user_telegrams::UserTelegramRepository},
};

/// Drains the reminder queue with a fixed number of workers. Returns once the queue is
/// closed and every worker has finished its last delivery.
pub async fn run<H, T, N>(
    reminder_delivery_usecase: Arc<ReminderDeliveryUseCase<H, T, N>>,
    receiver: mpsc::Receiver<i64>,
    workers: usize,
) -> Result<()>
where
    H: HabitRepository + Send + Sync + 'static,
    T: UserTelegramRepository + Send + Sync + 'static,
    N: ReminderNotifier + Send + Sync + 'static,
{
    info!(workers, "Starting reminder delivery workers");

    let receiver = Arc::new(Mutex::new(receiver));
    let mut join_set = JoinSet::new();

    for worker_id in 0..workers.max(1) {
        join_set.spawn(worker_loop(
            worker_id,
            Arc::clone(&reminder_delivery_usecase),
            Arc::clone(&receiver),
        ));
    }

    while let Some(result) = join_set.join_next().await {
        result?;
    }

    info!("Reminder delivery workers stopped");
    Ok(())
}

async fn worker_loop<H, T, N>(
    worker_id: usize,
    reminder_delivery_usecase: Arc<ReminderDeliveryUseCase<H, T, N>>,
    receiver: Arc<Mutex<mpsc::Receiver<i64>>>,
) where
    H: HabitRepository + Send + Sync + 'static,
    T: UserTelegramRepository + Send + Sync + 'static,
    N: ReminderNotifier + Send + Sync + 'static,
{
    loop {
        let next = receiver.lock().await.recv().await;
        let Some(habit_id) = next else {
            debug!(worker_id, "reminder delivery: queue closed");
            return;
        };

        match reminder_delivery_usecase.send_reminder(habit_id).await {
            Ok(outcome) => debug!(worker_id, habit_id, ?outcome, "reminder delivery: done"),
            Err(e) => error!(worker_id, habit_id, error = ?e, "reminder delivery: failed"),
        }
    }
}
