use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::{
    application::interfaces::reminders::{ReminderNotifier, ReminderQueue},
    domain::{
        repositories::{habits::HabitRepository, user_telegrams::UserTelegramRepository},
        value_objects::reminders::{
            ReminderCandidate, ReminderCheckSummary, ReminderDeliveryOutcome, reminder_text,
        },
    },
};

pub struct ReminderCheckUseCase<H, Q>
where
    H: HabitRepository + Send + Sync,
    Q: ReminderQueue + Send + Sync,
{
    habit_repository: Arc<H>,
    reminder_queue: Arc<Q>,
}

impl<H, Q> ReminderCheckUseCase<H, Q>
where
    H: HabitRepository + Send + Sync,
    Q: ReminderQueue + Send + Sync,
{
    pub fn new(habit_repository: Arc<H>, reminder_queue: Arc<Q>) -> Self {
        Self {
            habit_repository,
            reminder_queue,
        }
    }

    /// Claims every due habit and hands it to the delivery queue. A failure on one
    /// habit is counted and logged, the rest are still processed.
    pub async fn check_and_send_reminders(&self, now: DateTime<Utc>) -> Result<ReminderCheckSummary> {
        let habits = self.habit_repository.list_with_reminders().await?;

        let mut summary = ReminderCheckSummary {
            checked: habits.len(),
            ..ReminderCheckSummary::default()
        };

        for candidate in habits.iter().filter_map(ReminderCandidate::from_entity) {
            let Some(reason) = candidate.decide(now) else {
                continue;
            };
            summary.due += 1;

            match self
                .habit_repository
                .mark_reminded(candidate.habit_id, candidate.last_reminded_at, now)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        habit_id = candidate.habit_id,
                        "reminders: habit already claimed by another run"
                    );
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(
                        habit_id = candidate.habit_id,
                        error = ?e,
                        "reminders: failed to claim habit"
                    );
                    summary.failed += 1;
                    continue;
                }
            }

            match self.reminder_queue.enqueue(candidate.habit_id) {
                Ok(()) => {
                    debug!(
                        habit_id = candidate.habit_id,
                        reason = %reason,
                        "reminders: reminder enqueued"
                    );
                    summary.enqueued += 1;
                }
                Err(e) => {
                    error!(
                        habit_id = candidate.habit_id,
                        error = ?e,
                        "reminders: failed to enqueue reminder"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            checked = summary.checked,
            due = summary.due,
            enqueued = summary.enqueued,
            skipped = summary.skipped,
            failed = summary.failed,
            "reminders: check finished"
        );

        Ok(summary)
    }
}

pub struct ReminderDeliveryUseCase<H, T, N>
where
    H: HabitRepository + Send + Sync,
    T: UserTelegramRepository + Send + Sync,
    N: ReminderNotifier + Send + Sync,
{
    habit_repository: Arc<H>,
    user_telegram_repository: Arc<T>,
    notifier: Arc<N>,
}

impl<H, T, N> ReminderDeliveryUseCase<H, T, N>
where
    H: HabitRepository + Send + Sync,
    T: UserTelegramRepository + Send + Sync,
    N: ReminderNotifier + Send + Sync,
{
    pub fn new(habit_repository: Arc<H>, user_telegram_repository: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            habit_repository,
            user_telegram_repository,
            notifier,
        }
    }

    /// One best-effort delivery attempt. Notifier failures are reported in the
    /// outcome, never retried.
    pub async fn send_reminder(&self, habit_id: i64) -> Result<ReminderDeliveryOutcome> {
        let Some(record) = self.habit_repository.find_by_id(habit_id).await? else {
            warn!(habit_id, "reminders: habit disappeared before delivery");
            return Ok(ReminderDeliveryOutcome::HabitMissing);
        };

        let Some(profile) = self
            .user_telegram_repository
            .find_by_user_id(record.habit.user_id)
            .await?
        else {
            info!(
                habit_id,
                user_id = record.habit.user_id,
                "reminders: owner has no telegram profile, skipping"
            );
            return Ok(ReminderDeliveryOutcome::NoTelegramProfile);
        };

        let text = reminder_text(&record.habit.action);
        match self.notifier.send_message(&profile.chat_id, &text).await {
            Ok(()) => {
                info!(habit_id, "reminders: reminder delivered");
                Ok(ReminderDeliveryOutcome::Sent)
            }
            Err(e) => {
                error!(habit_id, error = ?e, "reminders: delivery failed");
                Ok(ReminderDeliveryOutcome::Failed)
            }
        }
    }
}
