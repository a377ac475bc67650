use thiserror::Error;

/// A write rejected by a unique constraint, named the way Postgres names it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unique constraint violated: {constraint}")]
pub struct UniqueViolation {
    pub constraint: String,
}

impl UniqueViolation {
    pub fn new(constraint: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
        }
    }

    /// Constraint name when `err` carries a unique violation.
    pub fn constraint_of(err: &anyhow::Error) -> Option<&str> {
        err.downcast_ref::<UniqueViolation>()
            .map(|violation| violation.constraint.as_str())
    }
}
