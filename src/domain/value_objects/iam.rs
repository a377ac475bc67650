use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{
    entities::users::RegisterUserEntity,
    value_objects::validation::{blank_to_none, validation_error},
};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// The authenticated caller, resolved from a bearer access token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserModel {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub password: String,
    pub password2: String,
    #[validate(length(max = 255))]
    pub avatar: Option<String>,
    #[validate(custom(function = "crate::domain::value_objects::validation::validate_phone_number"))]
    pub phone_number: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub city: Option<String>,
}

impl RegisterUserModel {
    /// Field checks plus the password confirmation and strength rules.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if self.password != self.password2 {
            errors.add(
                "password",
                validation_error("password_mismatch", "Passwords do not match."),
            );
        }
        for error in password_strength_errors(&self.password) {
            errors.add("password", error);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn to_entity(&self, password_hash: String, now: DateTime<Utc>) -> RegisterUserEntity {
        RegisterUserEntity {
            email: normalize_email(&self.email),
            password_hash,
            avatar: blank_to_none(self.avatar.clone()),
            phone_number: blank_to_none(self.phone_number.clone()),
            city: blank_to_none(self.city.clone()),
            timezone: DEFAULT_TIMEZONE.to_string(),
            last_active: now,
            is_active: true,
            is_staff: false,
            date_joined: now,
        }
    }
}

pub fn password_strength_errors(password: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(validation_error(
            "password_too_short",
            "This password is too short. It must contain at least 8 characters.",
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push(validation_error(
            "password_entirely_numeric",
            "This password is entirely numeric.",
        ));
    }
    errors
}

/// Lower-cases the domain part and trims surrounding whitespace; the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenModel {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPairModel {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenModel {
    pub access: String,
}
