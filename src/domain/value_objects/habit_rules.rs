//! The one rule set every habit passes before it is stored.
//!
//! Both the API layer and the persistence layer only accept a [`ValidatedHabit`],
//! which can only be produced by [`HabitDraft::validate`].

use chrono::{DateTime, NaiveTime, Utc};
use validator::ValidationErrors;

use crate::domain::{
    entities::habits::{EditHabitEntity, HabitEntity, InsertHabitEntity},
    value_objects::{
        enums::repeat_modes::RepeatMode,
        validation::{NON_FIELD_ERRORS, blank_to_none, validation_error},
    },
};

pub const MAX_DURATION_SECONDS: i16 = 120;
pub const MIN_PERIODICITY_DAYS: i16 = 1;
pub const MAX_PERIODICITY_DAYS: i16 = 7;
pub const MAX_TEXT_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct HabitDraft {
    pub action: String,
    pub time: NaiveTime,
    pub place: String,
    pub periodicity: i16,
    pub reward: Option<String>,
    pub related_habit_id: Option<i64>,
    pub is_pleasant: bool,
    pub duration: i16,
    pub is_public: bool,
    pub remind_at: Option<DateTime<Utc>>,
    pub repeat: RepeatMode,
}

/// The stored state of the habit a draft points to through `related_habit_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedHabit {
    pub id: i64,
    pub is_pleasant: bool,
}

impl From<&HabitEntity> for RelatedHabit {
    fn from(entity: &HabitEntity) -> Self {
        Self {
            id: entity.id,
            is_pleasant: entity.is_pleasant,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedHabit(HabitDraft);

impl HabitDraft {
    pub fn from_entity(entity: &HabitEntity) -> Self {
        Self {
            action: entity.action.clone(),
            time: entity.time,
            place: entity.place.clone(),
            periodicity: entity.periodicity,
            reward: entity.reward.clone(),
            related_habit_id: entity.related_habit_id,
            is_pleasant: entity.is_pleasant,
            duration: entity.duration,
            is_public: entity.is_public,
            remind_at: entity.remind_at,
            repeat: entity.repeat.parse().unwrap_or_default(),
        }
    }

    /// `habit_id` is the id of the habit being edited, `None` on create.
    /// `related` is the stored habit `related_habit_id` resolved to, if any.
    pub fn validate(
        mut self,
        habit_id: Option<i64>,
        related: Option<RelatedHabit>,
    ) -> Result<ValidatedHabit, ValidationErrors> {
        self.reward = blank_to_none(self.reward);

        let mut errors = ValidationErrors::new();

        check_text(&mut errors, "action", &self.action, true);
        check_text(&mut errors, "place", &self.place, true);
        if let Some(reward) = &self.reward {
            check_text(&mut errors, "reward", reward, false);
        }

        if self.reward.is_some() && self.related_habit_id.is_some() {
            errors.add(
                NON_FIELD_ERRORS,
                validation_error(
                    "reward_and_related_habit",
                    "Specify either a reward or a related habit, not both.",
                ),
            );
        }

        if self.is_pleasant && (self.reward.is_some() || self.related_habit_id.is_some()) {
            errors.add(
                NON_FIELD_ERRORS,
                validation_error(
                    "pleasant_habit_with_reward",
                    "A pleasant habit cannot have a reward or a related habit.",
                ),
            );
        }

        if self.duration > MAX_DURATION_SECONDS {
            errors.add(
                "duration",
                validation_error("duration_too_long", "Duration cannot exceed 120 seconds."),
            );
        } else if self.duration < 0 {
            errors.add(
                "duration",
                validation_error("duration_negative", "Duration cannot be negative."),
            );
        }

        if !(MIN_PERIODICITY_DAYS..=MAX_PERIODICITY_DAYS).contains(&self.periodicity) {
            errors.add(
                "periodicity",
                validation_error(
                    "periodicity_out_of_range",
                    "Periodicity must be between 1 and 7 days.",
                ),
            );
        }

        if let Some(related_habit_id) = self.related_habit_id {
            match related.filter(|related| related.id == related_habit_id) {
                None => errors.add(
                    "related_habit",
                    validation_error("related_habit_missing", "Related habit does not exist."),
                ),
                Some(_) if Some(related_habit_id) == habit_id => errors.add(
                    "related_habit",
                    validation_error(
                        "related_habit_self",
                        "A habit cannot be related to itself.",
                    ),
                ),
                Some(related) if !related.is_pleasant => errors.add(
                    "related_habit",
                    validation_error(
                        "related_habit_not_pleasant",
                        "Only pleasant habits can be linked as related habits.",
                    ),
                ),
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(ValidatedHabit(self))
        } else {
            Err(errors)
        }
    }
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, value: &str, required: bool) {
    if required && value.trim().is_empty() {
        errors.add(field, validation_error("blank", "This field may not be blank."));
    } else if value.chars().count() > MAX_TEXT_LENGTH {
        errors.add(
            field,
            validation_error("too_long", "Ensure this field has no more than 255 characters."),
        );
    }
}

impl ValidatedHabit {
    pub fn draft(&self) -> &HabitDraft {
        &self.0
    }

    pub fn into_insert_entity(self, user_id: i64, now: DateTime<Utc>) -> InsertHabitEntity {
        let draft = self.0;
        InsertHabitEntity {
            user_id,
            action: draft.action,
            time: draft.time,
            place: draft.place,
            periodicity: draft.periodicity,
            reward: draft.reward,
            related_habit_id: draft.related_habit_id,
            is_pleasant: draft.is_pleasant,
            duration: draft.duration,
            is_public: draft.is_public,
            remind_at: draft.remind_at,
            repeat: draft.repeat.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_edit_entity(self, now: DateTime<Utc>) -> EditHabitEntity {
        let draft = self.0;
        EditHabitEntity {
            action: draft.action,
            time: draft.time,
            place: draft.place,
            periodicity: draft.periodicity,
            reward: draft.reward,
            related_habit_id: draft.related_habit_id,
            is_pleasant: draft.is_pleasant,
            duration: draft.duration,
            is_public: draft.is_public,
            remind_at: draft.remind_at,
            repeat: draft.repeat.to_string(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> HabitDraft {
        HabitDraft {
            action: "Walk".to_string(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            place: "Park".to_string(),
            periodicity: 1,
            reward: None,
            related_habit_id: None,
            is_pleasant: false,
            duration: 60,
            is_public: false,
            remind_at: None,
            repeat: RepeatMode::None,
        }
    }

    fn pleasant(id: i64) -> RelatedHabit {
        RelatedHabit {
            id,
            is_pleasant: true,
        }
    }

    fn has_error(errors: &ValidationErrors, field: &str) -> bool {
        errors.field_errors().contains_key(field)
    }

    #[test]
    fn plain_habit_passes() {
        assert!(draft().validate(None, None).is_ok());
    }

    #[test]
    fn reward_and_related_habit_are_mutually_exclusive() {
        let candidate = HabitDraft {
            reward: Some("Chocolate".to_string()),
            related_habit_id: Some(7),
            ..draft()
        };

        let errors = candidate.validate(None, Some(pleasant(7))).unwrap_err();
        assert!(has_error(&errors, NON_FIELD_ERRORS));
    }

    #[test]
    fn pleasant_habit_cannot_carry_reward_or_related_habit() {
        let with_reward = HabitDraft {
            is_pleasant: true,
            reward: Some("Cake".to_string()),
            ..draft()
        };
        assert!(has_error(
            &with_reward.validate(None, None).unwrap_err(),
            NON_FIELD_ERRORS
        ));

        let with_related = HabitDraft {
            is_pleasant: true,
            related_habit_id: Some(3),
            ..draft()
        };
        assert!(has_error(
            &with_related.validate(None, Some(pleasant(3))).unwrap_err(),
            NON_FIELD_ERRORS
        ));
    }

    #[test]
    fn duration_is_capped_at_120_seconds() {
        assert!(HabitDraft { duration: 120, ..draft() }.validate(None, None).is_ok());

        let errors = HabitDraft { duration: 121, ..draft() }
            .validate(None, None)
            .unwrap_err();
        assert!(has_error(&errors, "duration"));
    }

    #[test]
    fn periodicity_must_stay_within_a_week() {
        for periodicity in [1, 7] {
            assert!(HabitDraft { periodicity, ..draft() }.validate(None, None).is_ok());
        }
        for periodicity in [0, 8, -1] {
            let errors = HabitDraft { periodicity, ..draft() }
                .validate(None, None)
                .unwrap_err();
            assert!(has_error(&errors, "periodicity"));
        }
    }

    #[test]
    fn related_habit_must_exist_and_be_pleasant() {
        let linked = HabitDraft {
            related_habit_id: Some(9),
            ..draft()
        };

        assert!(has_error(
            &linked.clone().validate(None, None).unwrap_err(),
            "related_habit"
        ));

        let not_pleasant = RelatedHabit {
            id: 9,
            is_pleasant: false,
        };
        assert!(has_error(
            &linked.clone().validate(None, Some(not_pleasant)).unwrap_err(),
            "related_habit"
        ));

        assert!(linked.validate(None, Some(pleasant(9))).is_ok());
    }

    #[test]
    fn habit_cannot_relate_to_itself() {
        let linked = HabitDraft {
            related_habit_id: Some(4),
            ..draft()
        };
        let errors = linked.validate(Some(4), Some(pleasant(4))).unwrap_err();
        assert!(has_error(&errors, "related_habit"));
    }

    #[test]
    fn blank_reward_counts_as_no_reward() {
        let candidate = HabitDraft {
            reward: Some("  ".to_string()),
            related_habit_id: Some(2),
            ..draft()
        };
        let validated = candidate.validate(None, Some(pleasant(2))).unwrap();
        assert_eq!(validated.draft().reward, None);
    }

    #[test]
    fn blank_and_oversized_text_is_rejected() {
        let errors = HabitDraft {
            action: " ".to_string(),
            place: "x".repeat(256),
            ..draft()
        }
        .validate(None, None)
        .unwrap_err();
        assert!(has_error(&errors, "action"));
        assert!(has_error(&errors, "place"));
    }

    #[test]
    fn insert_entity_carries_owner_and_repeat_mode() {
        let now = Utc::now();
        let entity = HabitDraft {
            repeat: RepeatMode::Weekly,
            ..draft()
        }
        .validate(None, None)
        .unwrap()
        .into_insert_entity(11, now);

        assert_eq!(entity.user_id, 11);
        assert_eq!(entity.repeat, "weekly");
        assert_eq!(entity.created_at, now);
    }
}
