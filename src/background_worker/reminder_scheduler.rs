use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::{
    application::{interfaces::reminders::ReminderQueue, usecases::reminders::ReminderCheckUseCase},
    domain::repositories::habits::HabitRepository,
};

/// Runs the reminder check on a fixed interval. Checks never overlap within the process
/// and ticks missed while a check is running are dropped.
pub async fn run<H, Q>(
    reminder_check_usecase: Arc<ReminderCheckUseCase<H, Q>>,
    check_interval: Duration,
) -> Result<()>
where
    H: HabitRepository + Send + Sync + 'static,
    Q: ReminderQueue + Send + Sync + 'static,
{
    info!(
        interval_secs = check_interval.as_secs(),
        "Starting reminder scheduler loop"
    );

    let mut interval = tokio::time::interval(check_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if let Err(e) = reminder_check_usecase
            .check_and_send_reminders(Utc::now())
            .await
        {
            error!(error = ?e, "reminder scheduler: check failed");
        }
    }
}
