//! Item and outfit actions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info_span;

use super::{respond, ActionError, ActionResult, Session, WardrobeActions};
use crate::catalog::{Category, Colour, Environment, Size};
use crate::db::item_repo::{self, ItemRecord, NewItem};
use crate::db::outfit_repo::{self, OutfitRow, OutfitWithItems};

/// Tag form submitted after an item photo is uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUpload {
    pub item_name: String,
    pub item_url: String,
    pub category: String,
    pub colour: String,
    pub size: String,
    pub environment: String,
    #[serde(default)]
    pub waterproof: bool,
}

impl ItemUpload {
    fn validate(&self, user_id: i64) -> Result<NewItem, ActionError> {
        let item_name = self.item_name.trim();
        if item_name.is_empty() {
            return Err(ActionError::validation("Item name is required"));
        }
        if self.item_url.trim().is_empty() {
            return Err(ActionError::validation("Item photo is required"));
        }
        let category = Category::from_name(&self.category)
            .ok_or_else(|| ActionError::validation(format!("Unknown category '{}'", self.category)))?;
        let colour = Colour::by_name(&self.colour)
            .ok_or_else(|| ActionError::validation(format!("Unknown colour '{}'", self.colour)))?;
        let size = Size::from_name(&self.size)
            .ok_or_else(|| ActionError::validation(format!("Unknown size '{}'", self.size)))?;
        let environment = Environment::parse(&self.environment).ok_or_else(|| {
            ActionError::validation(format!("Unknown environment '{}'", self.environment))
        })?;

        Ok(NewItem {
            user_id,
            item_name: item_name.to_string(),
            item_url: self.item_url.trim().to_string(),
            category,
            colour_id: colour.id,
            size,
            environment,
            waterproof: self.waterproof,
        })
    }
}

/// An outfit laid out for rendering: buckets in display order plus the
/// categories the outfit could still take.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayOutfit {
    pub outfit: OutfitRow,
    pub buckets: IndexMap<Category, Vec<ItemRecord>>,
    pub missing: Vec<Category>,
    pub likes: u64,
}

impl WardrobeActions {
    pub fn create_item(&self, session: &Session, upload: &ItemUpload) -> ActionResult<ItemRecord> {
        let _span = info_span!("action.create_item").entered();
        respond("create_item", self.try_create_item(session, upload).map(ActionResult::ok))
    }

    pub fn delete_item(&self, session: &Session, item_id: i64) -> ActionResult<()> {
        let _span = info_span!("action.delete_item", item_id).entered();
        respond("delete_item", self.try_delete_item(session, item_id).map(ActionResult::ok))
    }

    /// The caller's items grouped into category buckets.
    pub fn wardrobe(&self, session: &Session) -> ActionResult<IndexMap<Category, Vec<ItemRecord>>> {
        respond("wardrobe", self.try_wardrobe(session).map(ActionResult::ok))
    }

    pub fn create_outfit(
        &self,
        session: &Session,
        outfit_name: &str,
        item_ids: &[i64],
    ) -> ActionResult<OutfitWithItems> {
        let _span = info_span!("action.create_outfit", items = item_ids.len()).entered();
        respond(
            "create_outfit",
            self.try_create_outfit(session, outfit_name, item_ids)
                .map(ActionResult::ok),
        )
    }

    /// Swaps one item of the caller's outfit for another of their items.
    pub fn update_outfit(
        &self,
        session: &Session,
        outfit_id: i64,
        new_item_id: i64,
        old_item_id: i64,
    ) -> ActionResult<OutfitWithItems> {
        let _span = info_span!("action.update_outfit", outfit_id).entered();
        respond(
            "update_outfit",
            self.try_update_outfit(session, outfit_id, new_item_id, old_item_id)
                .map(ActionResult::ok),
        )
    }

    pub fn delete_outfit(&self, session: &Session, outfit_id: i64) -> ActionResult<()> {
        let _span = info_span!("action.delete_outfit", outfit_id).entered();
        respond("delete_outfit", self.try_delete_outfit(session, outfit_id).map(ActionResult::ok))
    }

    /// Loads an outfit and lays its items out in display order. Outfits are
    /// public, so no session is needed.
    pub fn display_outfit(&self, outfit_id: i64) -> ActionResult<DisplayOutfit> {
        respond("display_outfit", self.try_display_outfit(outfit_id).map(ActionResult::ok))
    }

    fn try_create_item(&self, session: &Session, upload: &ItemUpload) -> Result<ItemRecord, ActionError> {
        let user_id = session.require_user()?;
        let new_item = upload.validate(user_id)?;
        let item_id = item_repo::insert(&self.db, &new_item)?;
        item_repo::find_by_id(&self.db, item_id)?.ok_or(ActionError::NotFound {
            kind: "item",
            id: item_id,
        })
    }

    fn try_delete_item(&self, session: &Session, item_id: i64) -> Result<(), ActionError> {
        let user_id = session.require_user()?;
        if !item_repo::delete_owned(&self.db, user_id, item_id)? {
            return Err(ActionError::NotFound {
                kind: "item",
                id: item_id,
            });
        }
        Ok(())
    }

    fn try_wardrobe(&self, session: &Session) -> Result<IndexMap<Category, Vec<ItemRecord>>, ActionError> {
        let user_id = session.require_user()?;
        let items = item_repo::list_by_user(&self.db, user_id, None)?;
        Ok(self.categorizer.categorize(items))
    }

    fn try_create_outfit(
        &self,
        session: &Session,
        outfit_name: &str,
        item_ids: &[i64],
    ) -> Result<OutfitWithItems, ActionError> {
        let user_id = session.require_user()?;
        let outfit_name = outfit_name.trim();
        if outfit_name.is_empty() || item_ids.is_empty() {
            return Err(ActionError::validation(
                "Name and at least one item are required",
            ));
        }
        let owned = item_repo::owned_ids(&self.db, user_id, item_ids)?;
        if owned.len() != item_ids.len() {
            return Err(ActionError::Forbidden { kind: "item" });
        }

        let outfit_id = outfit_repo::insert_with_items(&self.db, user_id, outfit_name, item_ids)?;
        outfit_repo::find_with_items(&self.db, outfit_id)?.ok_or(ActionError::NotFound {
            kind: "outfit",
            id: outfit_id,
        })
    }

    fn try_update_outfit(
        &self,
        session: &Session,
        outfit_id: i64,
        new_item_id: i64,
        old_item_id: i64,
    ) -> Result<OutfitWithItems, ActionError> {
        let user_id = session.require_user()?;
        if new_item_id == old_item_id {
            return Err(ActionError::validation("Pick a different item to swap in"));
        }
        if item_repo::owned_ids(&self.db, user_id, &[new_item_id])?.is_empty() {
            return Err(ActionError::Forbidden { kind: "item" });
        }
        if outfit_repo::contains_item(&self.db, outfit_id, new_item_id)? {
            return Err(ActionError::validation("Item is already in this outfit"));
        }
        let not_found = ActionError::NotFound {
            kind: "outfit",
            id: outfit_id,
        };
        if !outfit_repo::replace_item(&self.db, user_id, outfit_id, old_item_id, new_item_id)? {
            return Err(not_found);
        }
        outfit_repo::find_with_items(&self.db, outfit_id)?.ok_or(not_found)
    }

    fn try_delete_outfit(&self, session: &Session, outfit_id: i64) -> Result<(), ActionError> {
        let user_id = session.require_user()?;
        if !outfit_repo::delete_owned(&self.db, user_id, outfit_id)? {
            return Err(ActionError::NotFound {
                kind: "outfit",
                id: outfit_id,
            });
        }
        Ok(())
    }

    fn try_display_outfit(&self, outfit_id: i64) -> Result<DisplayOutfit, ActionError> {
        let OutfitWithItems { outfit, items } = outfit_repo::find_with_items(&self.db, outfit_id)?
            .ok_or(ActionError::NotFound {
                kind: "outfit",
                id: outfit_id,
            })?;

        let buckets: IndexMap<Category, Vec<ItemRecord>> = self
            .categorizer
            .categorize(items)
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .collect();
        let buckets = self.categorizer.sort_by_display_order(buckets);
        let missing = self.categorizer.missing_categories(&buckets);
        let likes = outfit_repo::like_count(&self.db, outfit_id)?;

        Ok(DisplayOutfit {
            outfit,
            buckets,
            missing,
            likes,
        })
    }
}
