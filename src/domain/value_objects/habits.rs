use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::habits::{HabitEntity, HabitRecord},
    value_objects::{
        enums::repeat_modes::RepeatMode, habit_rules::HabitDraft, validation::deserialize_some,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitModel {
    pub id: i64,
    pub owner_email: String,
    pub action: String,
    pub time: NaiveTime,
    pub place: String,
    pub periodicity: i16,
    pub reward: Option<String>,
    pub related_habit: Option<i64>,
    pub is_pleasant: bool,
    pub duration: i16,
    pub is_public: bool,
    pub remind_at: Option<DateTime<Utc>>,
    pub repeat: RepeatMode,
    pub last_reminded_at: Option<DateTime<Utc>>,
}

impl From<HabitRecord> for HabitModel {
    fn from(record: HabitRecord) -> Self {
        let HabitRecord { habit, owner_email } = record;
        let repeat = habit.repeat.parse().unwrap_or_default();
        Self {
            id: habit.id,
            owner_email,
            action: habit.action,
            time: habit.time,
            place: habit.place,
            periodicity: habit.periodicity,
            reward: habit.reward,
            related_habit: habit.related_habit_id,
            is_pleasant: habit.is_pleasant,
            duration: habit.duration,
            is_public: habit.is_public,
            remind_at: habit.remind_at,
            repeat,
            last_reminded_at: habit.last_reminded_at,
        }
    }
}

fn default_periodicity() -> i16 {
    1
}

/// Body of create (POST) and full update (PUT).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpsertHabitModel {
    pub action: String,
    pub time: NaiveTime,
    pub place: String,
    #[serde(default = "default_periodicity")]
    pub periodicity: i16,
    #[serde(default)]
    pub reward: Option<String>,
    #[serde(default)]
    pub related_habit: Option<i64>,
    #[serde(default)]
    pub is_pleasant: bool,
    pub duration: i16,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub remind_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repeat: RepeatMode,
}

impl UpsertHabitModel {
    pub fn into_draft(self) -> HabitDraft {
        HabitDraft {
            action: self.action,
            time: self.time,
            place: self.place,
            periodicity: self.periodicity,
            reward: self.reward,
            related_habit_id: self.related_habit,
            is_pleasant: self.is_pleasant,
            duration: self.duration,
            is_public: self.is_public,
            remind_at: self.remind_at,
            repeat: self.repeat,
        }
    }
}

/// Body of a partial update (PATCH). Nullable fields accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatchHabitModel {
    pub action: Option<String>,
    pub time: Option<NaiveTime>,
    pub place: Option<String>,
    pub periodicity: Option<i16>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub reward: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub related_habit: Option<Option<i64>>,
    pub is_pleasant: Option<bool>,
    pub duration: Option<i16>,
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remind_at: Option<Option<DateTime<Utc>>>,
    pub repeat: Option<RepeatMode>,
}

impl PatchHabitModel {
    pub fn apply_to(self, current: &HabitEntity) -> HabitDraft {
        let base = HabitDraft::from_entity(current);
        HabitDraft {
            action: self.action.unwrap_or(base.action),
            time: self.time.unwrap_or(base.time),
            place: self.place.unwrap_or(base.place),
            periodicity: self.periodicity.unwrap_or(base.periodicity),
            reward: self.reward.unwrap_or(base.reward),
            related_habit_id: self.related_habit.unwrap_or(base.related_habit_id),
            is_pleasant: self.is_pleasant.unwrap_or(base.is_pleasant),
            duration: self.duration.unwrap_or(base.duration),
            is_public: self.is_public.unwrap_or(base.is_public),
            remind_at: self.remind_at.unwrap_or(base.remind_at),
            repeat: self.repeat.unwrap_or(base.repeat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> HabitEntity {
        let now = Utc::now();
        HabitEntity {
            id: 3,
            user_id: 1,
            action: "Stretch".to_string(),
            time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            place: "Bedroom".to_string(),
            periodicity: 2,
            reward: Some("Coffee".to_string()),
            related_habit_id: None,
            is_pleasant: false,
            duration: 100,
            is_public: true,
            remind_at: Some(now),
            repeat: "daily".to_string(),
            last_reminded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn upsert_defaults_match_the_model_defaults() {
        let body = r#"{"action":"Walk","time":"08:00:00","place":"Street","duration":30}"#;
        let model: UpsertHabitModel = serde_json::from_str(body).unwrap();
        assert_eq!(model.periodicity, 1);
        assert!(!model.is_pleasant);
        assert!(!model.is_public);
        assert_eq!(model.repeat, RepeatMode::None);
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let body = r#"{"reward":null,"related_habit":4}"#;
        let patch: PatchHabitModel = serde_json::from_str(body).unwrap();
        assert_eq!(patch.reward, Some(None));
        assert_eq!(patch.related_habit, Some(Some(4)));
        assert_eq!(patch.remind_at, None);

        let draft = patch.apply_to(&entity());
        assert_eq!(draft.reward, None);
        assert_eq!(draft.related_habit_id, Some(4));
        assert_eq!(draft.action, "Stretch");
        assert_eq!(draft.repeat, RepeatMode::Daily);
        assert!(draft.remind_at.is_some());
    }

    #[test]
    fn model_exposes_related_habit_and_owner() {
        let record = HabitRecord {
            habit: HabitEntity {
                related_habit_id: Some(8),
                reward: None,
                ..entity()
            },
            owner_email: "owner@example.com".to_string(),
        };
        let model = HabitModel::from(record);
        assert_eq!(model.related_habit, Some(8));
        assert_eq!(model.owner_email, "owner@example.com");
        assert_eq!(model.repeat, RepeatMode::Daily);
    }
}
