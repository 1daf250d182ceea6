//! Wardrobe actions: an authorization check followed by a single write.
//!
//! Actions on existing accounts take the caller's [`Session`]. All of them
//! answer with an [`ActionResult`]. Failures never escape as `Err`; they are logged and
//! translated into a failed result carrying a user-facing message.

pub mod account;
pub mod error;
pub mod social;
pub mod wardrobe;

use serde::Serialize;

use crate::categorizer::OutfitCategorizer;
use crate::db::Database;

pub use error::ActionError;
pub use wardrobe::{DisplayOutfit, ItemUpload};
pub use social::{PostDetails, PostDraft, Profile};

/// Identity of the caller, if signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    user_id: Option<i64>,
}

impl Session {
    pub fn signed_in(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn require_user(&self) -> Result<i64, ActionError> {
        self.user_id.ok_or(ActionError::NotAuthenticated)
    }
}

/// Uniform response of every action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            message: None,
            error: None,
        }
    }

    pub fn ok_with_message(payload: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(payload)
        }
    }

    pub fn failed(error: &ActionError) -> Self {
        Self {
            success: false,
            payload: None,
            message: None,
            error: Some(error.user_message()),
        }
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }
}

/// Logs a failed action and folds it into an [`ActionResult`].
fn respond<T>(action: &'static str, result: Result<ActionResult<T>, ActionError>) -> ActionResult<T> {
    match result {
        Ok(response) => response,
        Err(e) => {
            match &e {
                ActionError::Database(_) => tracing::error!(action, error = %e, "Action failed"),
                _ => tracing::info!(action, error = %e, "Action rejected"),
            }
            ActionResult::failed(&e)
        }
    }
}

/// Entry point for all wardrobe actions.
#[derive(Clone)]
pub struct WardrobeActions {
    db: Database,
    categorizer: std::sync::Arc<OutfitCategorizer>,
}

impl WardrobeActions {
    pub fn new(db: Database) -> Self {
        Self::with_categorizer(db, OutfitCategorizer::default())
    }

    pub fn with_categorizer(db: Database, categorizer: OutfitCategorizer) -> Self {
        Self {
            db,
            categorizer: std::sync::Arc::new(categorizer),
        }
    }
}
