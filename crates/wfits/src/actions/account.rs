//! Sign-up: username checks and account creation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info_span;

use super::{respond, ActionError, ActionResult, WardrobeActions};
use crate::db::user_repo::{self, UserRow};

static RE_USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

const USERNAME_MIN: usize = 3;

fn validate_username(username: &str) -> Result<(), ActionError> {
    if username.is_empty() {
        return Err(ActionError::validation("Username is required"));
    }
    if username.chars().count() < USERNAME_MIN {
        return Err(ActionError::validation(format!(
            "Username must be at least {} characters.",
            USERNAME_MIN
        )));
    }
    if !RE_USERNAME.is_match(username) {
        return Err(ActionError::validation(
            "Username can only contain letters, numbers and underscores.",
        ));
    }
    Ok(())
}

impl WardrobeActions {
    /// Whether `username` can still be claimed. Usernames are case sensitive.
    pub fn username_available(&self, username: &str) -> ActionResult<bool> {
        respond(
            "username_available",
            self.try_username_available(username).map(ActionResult::ok),
        )
    }

    /// Registers a new account. Credentials live with the session provider.
    pub fn create_user(&self, username: &str) -> ActionResult<UserRow> {
        let _span = info_span!("action.create_user").entered();
        respond(
            "create_user",
            self.try_create_user(username).map(|user| {
                ActionResult::ok_with_message(user, "Account created successfully.")
            }),
        )
    }

    fn try_username_available(&self, username: &str) -> Result<bool, ActionError> {
        let username = username.trim();
        validate_username(username)?;
        Ok(!user_repo::username_taken(&self.db, username)?)
    }

    fn try_create_user(&self, username: &str) -> Result<UserRow, ActionError> {
        let username = username.trim();
        validate_username(username)?;
        if user_repo::username_taken(&self.db, username)? {
            return Err(ActionError::validation(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let user_id = user_repo::insert(&self.db, username, None)?;
        tracing::info!(user_id, "User created");
        user_repo::find_by_id(&self.db, user_id)?.ok_or(ActionError::NotFound {
            kind: "user",
            id: user_id,
        })
    }
}
