use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    entities::habits::HabitEntity, value_objects::enums::repeat_modes::RepeatMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderReason {
    First,
    DailyRepeat,
    WeeklyRepeat,
}

impl Display for ReminderReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            ReminderReason::First => "first",
            ReminderReason::DailyRepeat => "daily_repeat",
            ReminderReason::WeeklyRepeat => "weekly_repeat",
        };
        write!(f, "{}", reason)
    }
}

/// The scheduling fields of a habit that has a reminder configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderCandidate {
    pub habit_id: i64,
    pub remind_at: DateTime<Utc>,
    pub repeat: RepeatMode,
    pub last_reminded_at: Option<DateTime<Utc>>,
}

impl ReminderCandidate {
    pub fn from_entity(entity: &HabitEntity) -> Option<Self> {
        Some(Self {
            habit_id: entity.id,
            remind_at: entity.remind_at?,
            repeat: entity.repeat.parse().unwrap_or_default(),
            last_reminded_at: entity.last_reminded_at,
        })
    }

    /// A habit that was never reminded fires once `remind_at` has passed; afterwards only
    /// daily and weekly habits fire again, a full period after the previous reminder.
    pub fn decide(&self, now: DateTime<Utc>) -> Option<ReminderReason> {
        match (self.last_reminded_at, self.repeat) {
            (None, _) => (self.remind_at <= now).then_some(ReminderReason::First),
            (Some(last), RepeatMode::Daily) => {
                (now >= last + Duration::days(1)).then_some(ReminderReason::DailyRepeat)
            }
            (Some(last), RepeatMode::Weekly) => {
                (now >= last + Duration::days(7)).then_some(ReminderReason::WeeklyRepeat)
            }
            (Some(_), RepeatMode::None) => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReminderCheckSummary {
    pub checked: usize,
    pub due: usize,
    pub enqueued: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderDeliveryOutcome {
    Sent,
    HabitMissing,
    NoTelegramProfile,
    Failed,
}

pub fn reminder_text(action: &str) -> String {
    format!("Time to do your habit: {}!", action)
}
