use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::repositories::errors::UniqueViolation;

pub mod habits;
pub mod user_telegrams;
pub mod users;

/// Surfaces unique violations as `UniqueViolation` so use cases can answer them as client errors.
pub fn map_unique_violation(err: DieselError) -> anyhow::Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UniqueViolation::new(info.constraint_name().unwrap_or_default()).into()
        }
        other => other.into(),
    }
}
