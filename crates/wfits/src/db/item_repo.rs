//! Item repository: tagged wardrobe items.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{now_timestamp, Database, DatabaseError};
use crate::catalog::{Category, Environment, Size};
use crate::categorizer::Categorized;

/// Item joined with its category, colour and size tags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub item_id: i64,
    pub user_id: i64,
    pub item_name: String,
    pub item_url: String,
    pub category_id: u32,
    pub category_name: String,
    pub colour_id: u32,
    pub colour_name: String,
    pub colour_value: String,
    pub size_id: u32,
    pub size_name: String,
    pub slot: u32,
    pub environment: String,
    pub waterproof: bool,
    pub available: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ItemRecord {
    pub(crate) fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            item_id: row.get("item_id")?,
            user_id: row.get("user_id")?,
            item_name: row.get("item_name")?,
            item_url: row.get("item_url")?,
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
            colour_id: row.get("colour_id")?,
            colour_name: row.get("colour_name")?,
            colour_value: row.get("colour_value")?,
            size_id: row.get("size_id")?,
            size_name: row.get("size_name")?,
            slot: row.get("slot")?,
            environment: row.get("environment")?,
            waterproof: row.get("waterproof")?,
            available: row.get("available")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn category(&self) -> Option<Category> {
        Category::from_id(self.category_id)
    }
}

impl Categorized for ItemRecord {
    fn category_name(&self) -> &str {
        &self.category_name
    }
}

/// Fields required to create an item. The slot is derived from the category.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub user_id: i64,
    pub item_name: String,
    pub item_url: String,
    pub category: Category,
    pub colour_id: u32,
    pub size: Size,
    pub environment: Environment,
    pub waterproof: bool,
}

/// Shared SELECT with tag joins; callers append WHERE / ORDER BY.
pub(crate) const ITEM_SELECT: &str = "SELECT i.*, c.category_name, co.colour_name, co.colour_value, s.size_name
     FROM items i
     JOIN category_tags c ON c.category_id = i.category_id
     JOIN colour_tags co ON co.colour_id = i.colour_id
     JOIN size_tags s ON s.size_id = i.size_id";

pub fn insert(db: &Database, item: &NewItem) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO items (user_id, item_name, item_url, category_id, colour_id, size_id,
             slot, environment, waterproof, available, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?10)",
            params![
                item.user_id,
                item.item_name,
                item.item_url,
                item.category.id(),
                item.colour_id,
                item.size.id(),
                item.category.slot().index(),
                item.environment.as_str(),
                item.waterproof,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

pub fn find_by_id(db: &Database, item_id: i64) -> Result<Option<ItemRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!("{} WHERE i.item_id = ?1", ITEM_SELECT);
        let row = conn
            .query_row(&sql, params![item_id], ItemRecord::from_row)
            .optional()?;
        Ok(row)
    })
}

/// Lists a user's items ordered by name, optionally restricted to one category.
pub fn list_by_user(
    db: &Database,
    user_id: i64,
    category: Option<Category>,
) -> Result<Vec<ItemRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let rows = match category {
            Some(category) => {
                let sql = format!(
                    "{} WHERE i.user_id = ?1 AND i.category_id = ?2 ORDER BY i.item_name ASC",
                    ITEM_SELECT
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![user_id, category.id()], ItemRecord::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let sql = format!("{} WHERE i.user_id = ?1 ORDER BY i.item_name ASC", ITEM_SELECT);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![user_id], ItemRecord::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    })
}

/// Ids from `item_ids` that exist and belong to `user_id`.
pub fn owned_ids(db: &Database, user_id: i64, item_ids: &[i64]) -> Result<Vec<i64>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT 1 FROM items WHERE item_id = ?1 AND user_id = ?2")?;
        let mut owned = Vec::with_capacity(item_ids.len());
        for id in item_ids {
            if stmt.exists(params![id, user_id])? {
                owned.push(*id);
            }
        }
        Ok(owned)
    })
}

/// Deletes an item owned by `user_id`. Returns false when nothing matched.
pub fn delete_owned(db: &Database, user_id: i64, item_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "DELETE FROM items WHERE item_id = ?1 AND user_id = ?2",
            params![item_id, user_id],
        )?;
        Ok(changed > 0)
    })
}
