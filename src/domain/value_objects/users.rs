use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::users::{EditUserEntity, UserEntity},
    value_objects::validation::blank_to_none,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub motivation: Option<String>,
    pub timezone: String,
    pub last_active: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            avatar: entity.avatar,
            phone_number: entity.phone_number,
            city: entity.city,
            motivation: entity.motivation,
            timezone: entity.timezone,
            last_active: entity.last_active,
        }
    }
}

/// Profile update body; absent fields stay as they are and empty strings clear a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileModel {
    #[validate(length(max = 255))]
    pub avatar: Option<String>,
    #[validate(custom(function = "crate::domain::value_objects::validation::validate_phone_number"))]
    pub phone_number: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub city: Option<String>,
    pub motivation: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Timezone must be 1 to 50 characters."))]
    pub timezone: Option<String>,
}

impl UpdateProfileModel {
    pub fn to_entity(&self) -> EditUserEntity {
        let clearable = |value: &Option<String>| value.clone().map(|v| blank_to_none(Some(v)));

        EditUserEntity {
            avatar: clearable(&self.avatar),
            phone_number: clearable(&self.phone_number),
            city: clearable(&self.city),
            motivation: clearable(&self.motivation),
            timezone: self.timezone.clone().map(|tz| tz.trim().to_string()),
            ..EditUserEntity::default()
        }
    }
}
