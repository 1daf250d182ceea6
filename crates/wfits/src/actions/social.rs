//! Likes, follows, posts and profile actions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info_span;

use super::{respond, ActionError, ActionResult, Session, WardrobeActions};
use crate::db::outfit_repo::{self, OutfitRow};
use crate::db::post_repo::{self, NewPost, PostRow};
use crate::db::user_repo::{self, UserRow};

static RE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").unwrap());

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;

/// Post form contents. Images are already-uploaded URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub post_title: String,
    pub post_text: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub outfit_ids: Vec<i64>,
}

/// Public profile page data.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: UserRow,
    pub followers: u64,
    pub following: u64,
    /// Whether the viewing session follows this user.
    pub followed_by_viewer: bool,
    pub outfits: Vec<OutfitRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    pub post: PostRow,
    pub outfit_ids: Vec<i64>,
    pub likes: u64,
    pub liked_by_viewer: bool,
}

impl WardrobeActions {
    /// Likes the post, or unlikes it when already liked. The payload is the
    /// new liked state.
    pub fn toggle_like_post(&self, session: &Session, post_id: i64) -> ActionResult<bool> {
        let _span = info_span!("action.toggle_like_post", post_id).entered();
        respond(
            "toggle_like_post",
            self.try_toggle_like_post(session, post_id).map(|liked| {
                let message = if liked {
                    "Liked post successfully."
                } else {
                    "Unliked post successfully."
                };
                ActionResult::ok_with_message(liked, message)
            }),
        )
    }

    pub fn toggle_like_outfit(&self, session: &Session, outfit_id: i64) -> ActionResult<bool> {
        let _span = info_span!("action.toggle_like_outfit", outfit_id).entered();
        respond(
            "toggle_like_outfit",
            self.try_toggle_like_outfit(session, outfit_id).map(|liked| {
                let message = if liked {
                    "Liked outfit successfully."
                } else {
                    "Unliked outfit successfully."
                };
                ActionResult::ok_with_message(liked, message)
            }),
        )
    }

    /// Follows `target_user_id`, or unfollows when already following. The
    /// payload is the new following state.
    pub fn toggle_follow_user(&self, session: &Session, target_user_id: i64) -> ActionResult<bool> {
        let _span = info_span!("action.toggle_follow_user", target_user_id).entered();
        respond(
            "toggle_follow_user",
            self.try_toggle_follow(session, target_user_id).map(|following| {
                let message = if following {
                    "Followed user successfully."
                } else {
                    "Unfollowed user successfully."
                };
                ActionResult::ok_with_message(following, message)
            }),
        )
    }

    pub fn create_post(&self, session: &Session, draft: &PostDraft) -> ActionResult<PostRow> {
        let _span = info_span!("action.create_post", outfits = draft.outfit_ids.len()).entered();
        respond("create_post", self.try_create_post(session, draft).map(ActionResult::ok))
    }

    /// Posts of the users the caller follows, newest first.
    pub fn feed(&self, session: &Session, limit: u64) -> ActionResult<Vec<PostRow>> {
        respond("feed", self.try_feed(session, limit).map(ActionResult::ok))
    }

    /// Profile of `username`. Anonymous sessions may view profiles.
    pub fn profile(&self, session: &Session, username: &str) -> ActionResult<Profile> {
        respond("profile", self.try_profile(session, username).map(ActionResult::ok))
    }

    pub fn post_details(&self, session: &Session, post_id: i64) -> ActionResult<PostDetails> {
        respond("post_details", self.try_post_details(session, post_id).map(ActionResult::ok))
    }

    pub fn update_name(&self, session: &Session, name: &str) -> ActionResult<UserRow> {
        let _span = info_span!("action.update_name").entered();
        respond("update_name", self.try_update_name(session, name).map(ActionResult::ok))
    }

    pub fn update_profile_photo(&self, session: &Session, photo_url: &str) -> ActionResult<UserRow> {
        let _span = info_span!("action.update_profile_photo").entered();
        respond(
            "update_profile_photo",
            self.try_update_profile_photo(session, photo_url)
                .map(ActionResult::ok),
        )
    }

    fn try_toggle_like_post(&self, session: &Session, post_id: i64) -> Result<bool, ActionError> {
        let user_id = session.require_user()?;
        if post_repo::find_by_id(&self.db, post_id)?.is_none() {
            return Err(ActionError::NotFound {
                kind: "post",
                id: post_id,
            });
        }
        if post_repo::is_liked(&self.db, user_id, post_id)? {
            post_repo::unlike(&self.db, user_id, post_id)?;
            Ok(false)
        } else {
            post_repo::like(&self.db, user_id, post_id)?;
            Ok(true)
        }
    }

    fn try_toggle_like_outfit(&self, session: &Session, outfit_id: i64) -> Result<bool, ActionError> {
        let user_id = session.require_user()?;
        if outfit_repo::find_by_id(&self.db, outfit_id)?.is_none() {
            return Err(ActionError::NotFound {
                kind: "outfit",
                id: outfit_id,
            });
        }
        if outfit_repo::is_liked(&self.db, user_id, outfit_id)? {
            outfit_repo::unlike(&self.db, user_id, outfit_id)?;
            Ok(false)
        } else {
            outfit_repo::like(&self.db, user_id, outfit_id)?;
            Ok(true)
        }
    }

    fn try_toggle_follow(&self, session: &Session, target_user_id: i64) -> Result<bool, ActionError> {
        let user_id = session.require_user()?;
        if user_id == target_user_id {
            return Err(ActionError::validation("Cannot follow yourself."));
        }
        if user_repo::find_by_id(&self.db, target_user_id)?.is_none() {
            return Err(ActionError::NotFound {
                kind: "user",
                id: target_user_id,
            });
        }
        if user_repo::is_following(&self.db, user_id, target_user_id)? {
            user_repo::unfollow(&self.db, user_id, target_user_id)?;
            Ok(false)
        } else {
            user_repo::follow(&self.db, user_id, target_user_id)?;
            Ok(true)
        }
    }

    fn try_create_post(&self, session: &Session, draft: &PostDraft) -> Result<PostRow, ActionError> {
        let user_id = session.require_user()?;
        let post_title = draft.post_title.trim();
        let post_text = draft.post_text.trim();
        if post_title.is_empty() || post_text.is_empty() {
            return Err(ActionError::validation("Title and content are required"));
        }
        for outfit_id in &draft.outfit_ids {
            if outfit_repo::find_by_id(&self.db, *outfit_id)?.is_none() {
                return Err(ActionError::NotFound {
                    kind: "outfit",
                    id: *outfit_id,
                });
            }
        }

        let post_id = post_repo::insert(
            &self.db,
            &NewPost {
                user_id,
                post_title: post_title.to_string(),
                post_text: post_text.to_string(),
                images: draft.images.clone(),
                outfit_ids: draft.outfit_ids.clone(),
            },
        )?;
        post_repo::find_by_id(&self.db, post_id)?.ok_or(ActionError::NotFound {
            kind: "post",
            id: post_id,
        })
    }

    fn try_feed(&self, session: &Session, limit: u64) -> Result<Vec<PostRow>, ActionError> {
        let user_id = session.require_user()?;
        Ok(post_repo::feed_for(&self.db, user_id, limit)?)
    }

    fn try_profile(&self, session: &Session, username: &str) -> Result<Profile, ActionError> {
        let user = user_repo::find_by_username(&self.db, username)?
            .ok_or_else(|| ActionError::validation(format!("User '{}' not found", username)))?;
        let (followers, following) = user_repo::follow_counts(&self.db, user.user_id)?;
        let followed_by_viewer = match session.user_id() {
            Some(viewer) if viewer != user.user_id => {
                user_repo::is_following(&self.db, viewer, user.user_id)?
            }
            _ => false,
        };
        let outfits = outfit_repo::list_by_user(&self.db, user.user_id)?;

        Ok(Profile {
            user,
            followers,
            following,
            followed_by_viewer,
            outfits,
        })
    }

    fn try_post_details(&self, session: &Session, post_id: i64) -> Result<PostDetails, ActionError> {
        let post = post_repo::find_by_id(&self.db, post_id)?.ok_or(ActionError::NotFound {
            kind: "post",
            id: post_id,
        })?;
        let liked_by_viewer = match session.user_id() {
            Some(viewer) => post_repo::is_liked(&self.db, viewer, post_id)?,
            None => false,
        };

        Ok(PostDetails {
            outfit_ids: post_repo::outfit_ids(&self.db, post_id)?,
            likes: post_repo::like_count(&self.db, post_id)?,
            liked_by_viewer,
            post,
        })
    }

    fn try_update_name(&self, session: &Session, name: &str) -> Result<UserRow, ActionError> {
        let user_id = session.require_user()?;
        let name = name.trim();
        if !RE_NAME.is_match(name) {
            return Err(ActionError::validation(
                "Name can only contain letters and spaces.",
            ));
        }
        let length = name.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&length) {
            return Err(ActionError::validation(format!(
                "Name must be between {} and {} characters.",
                NAME_MIN, NAME_MAX
            )));
        }

        self.updated_user(user_id, user_repo::update_name(&self.db, user_id, name)?)
    }

    fn try_update_profile_photo(&self, session: &Session, photo_url: &str) -> Result<UserRow, ActionError> {
        let user_id = session.require_user()?;
        let photo_url = photo_url.trim();
        if photo_url.is_empty() {
            return Err(ActionError::validation("A photo is required"));
        }

        self.updated_user(
            user_id,
            user_repo::update_profile_photo(&self.db, user_id, photo_url)?,
        )
    }

    fn updated_user(&self, user_id: i64, changed: bool) -> Result<UserRow, ActionError> {
        let not_found = ActionError::NotFound {
            kind: "user",
            id: user_id,
        };
        if !changed {
            return Err(not_found);
        }
        user_repo::find_by_id(&self.db, user_id)?.ok_or(not_found)
    }
}
