use crate::domain::entities::{habits::HabitEntity, user_telegrams::UserTelegramEntity};

/// Public habits are readable by anyone, private ones only by their owner.
pub fn can_read_habit(requester_id: Option<i64>, habit: &HabitEntity) -> bool {
    habit.is_public || requester_id == Some(habit.user_id)
}

pub fn can_write_habit(requester_id: i64, habit: &HabitEntity) -> bool {
    habit.user_id == requester_id
}

pub fn is_profile_owner(requester_id: i64, profile: &UserTelegramEntity) -> bool {
    profile.user_id == requester_id
}
