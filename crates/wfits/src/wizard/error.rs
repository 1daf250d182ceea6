use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    NoSteps,

    #[error("Initial step {initial} is out of range for {total} steps")]
    InitialStepOutOfRange { initial: usize, total: usize },

    #[error("Step {step} is out of range for {total} steps")]
    StepOutOfRange { step: usize, total: usize },

    #[error("Wizard state lock poisoned")]
    LockPoisoned,
}

/// Failures of a [`super::WizardStore`] backend.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_wrap_database_errors() {
        let error = PersistenceError::from(DatabaseError::LockPoisoned);
        assert!(matches!(error, PersistenceError::Database(_)));
        assert_eq!(error.to_string(), "Database error: Database lock poisoned");
    }
}
