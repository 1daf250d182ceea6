use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Not allowed to modify this {kind}")]
    Forbidden { kind: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        ActionError::Validation(message.into())
    }

    /// Message safe to show the user. Storage failures are not described.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Database(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}
