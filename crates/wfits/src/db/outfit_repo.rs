//! Outfit repository: outfits, their items and outfit likes.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::item_repo::{ItemRecord, ITEM_SELECT};
use super::{now_timestamp, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutfitRow {
    pub outfit_id: i64,
    pub user_id: i64,
    pub outfit_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl OutfitRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            outfit_id: row.get("outfit_id")?,
            user_id: row.get("user_id")?,
            outfit_name: row.get("outfit_name")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Outfit with its items in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutfitWithItems {
    pub outfit: OutfitRow,
    pub items: Vec<ItemRecord>,
}

/// Creates an outfit and links its items in one transaction.
pub fn insert_with_items(
    db: &Database,
    user_id: i64,
    outfit_name: &str,
    item_ids: &[i64],
) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let now = now_timestamp();
        tx.execute(
            "INSERT INTO outfits (user_id, outfit_name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![user_id, outfit_name, now],
        )?;
        let outfit_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO outfit_items (outfit_id, item_id, position) VALUES (?1, ?2, ?3)",
            )?;
            for (position, item_id) in item_ids.iter().enumerate() {
                stmt.execute(params![outfit_id, item_id, position as i64])?;
            }
        }
        tx.commit()?;
        Ok(outfit_id)
    })
}

pub fn find_by_id(db: &Database, outfit_id: i64) -> Result<Option<OutfitRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM outfits WHERE outfit_id = ?1",
                params![outfit_id],
                OutfitRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

pub fn items_for_outfit(db: &Database, outfit_id: i64) -> Result<Vec<ItemRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "{} JOIN outfit_items oi ON oi.item_id = i.item_id WHERE oi.outfit_id = ?1 ORDER BY oi.position ASC",
            ITEM_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![outfit_id], ItemRecord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn find_with_items(db: &Database, outfit_id: i64) -> Result<Option<OutfitWithItems>, DatabaseError> {
    let Some(outfit) = find_by_id(db, outfit_id)? else {
        return Ok(None);
    };
    let items = items_for_outfit(db, outfit_id)?;
    Ok(Some(OutfitWithItems { outfit, items }))
}

/// Outfits of a user, newest first.
pub fn list_by_user(db: &Database, user_id: i64) -> Result<Vec<OutfitRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM outfits WHERE user_id = ?1 ORDER BY created_at DESC, outfit_id DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], OutfitRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn contains_item(db: &Database, outfit_id: i64, item_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM outfit_items WHERE outfit_id = ?1 AND item_id = ?2)",
            params![outfit_id, item_id],
            |r| r.get(0),
        )?;
        Ok(exists)
    })
}

/// Swaps `old_item_id` for `new_item_id` in an outfit owned by `user_id`,
/// keeping the old item's position. Returns false when the outfit is not
/// the user's or does not contain the old item.
pub fn replace_item(
    db: &Database,
    user_id: i64,
    outfit_id: i64,
    old_item_id: i64,
    new_item_id: i64,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let owned: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM outfits WHERE outfit_id = ?1 AND user_id = ?2)",
            params![outfit_id, user_id],
            |r| r.get(0),
        )?;
        if !owned {
            return Ok(false);
        }
        let position: Option<i64> = tx
            .query_row(
                "SELECT position FROM outfit_items WHERE outfit_id = ?1 AND item_id = ?2",
                params![outfit_id, old_item_id],
                |r| r.get(0),
            )
            .optional()?;
        let Some(position) = position else {
            return Ok(false);
        };
        tx.execute(
            "DELETE FROM outfit_items WHERE outfit_id = ?1 AND item_id = ?2",
            params![outfit_id, old_item_id],
        )?;
        tx.execute(
            "INSERT INTO outfit_items (outfit_id, item_id, position) VALUES (?1, ?2, ?3)",
            params![outfit_id, new_item_id, position],
        )?;
        tx.execute(
            "UPDATE outfits SET updated_at = ?2 WHERE outfit_id = ?1",
            params![outfit_id, now_timestamp()],
        )?;
        tx.commit()?;
        Ok(true)
    })
}

/// Deletes an outfit owned by `user_id`. Returns false when nothing matched.
pub fn delete_owned(db: &Database, user_id: i64, outfit_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "DELETE FROM outfits WHERE outfit_id = ?1 AND user_id = ?2",
            params![outfit_id, user_id],
        )?;
        Ok(changed > 0)
    })
}

pub fn is_liked(db: &Database, user_id: i64, outfit_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM outfit_likes WHERE user_id = ?1 AND outfit_id = ?2)",
            params![user_id, outfit_id],
            |r| r.get(0),
        )?;
        Ok(exists)
    })
}

pub fn like(db: &Database, user_id: i64, outfit_id: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO outfit_likes (user_id, outfit_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, outfit_id, now_timestamp()],
        )?;
        Ok(())
    })
}

pub fn unlike(db: &Database, user_id: i64, outfit_id: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "DELETE FROM outfit_likes WHERE user_id = ?1 AND outfit_id = ?2",
            params![user_id, outfit_id],
        )?;
        Ok(())
    })
}

pub fn like_count(db: &Database, outfit_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM outfit_likes WHERE outfit_id = ?1",
            params![outfit_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Environment, Size};
    use crate::db::item_repo::{self, NewItem};
    use crate::db::user_repo;

    fn add_item(db: &Database, user_id: i64, name: &str, category: Category) -> i64 {
        item_repo::insert(
            db,
            &NewItem {
                user_id,
                item_name: name.to_string(),
                item_url: "https://img.example/x.png".to_string(),
                category,
                colour_id: 0,
                size: Size::M,
                environment: Environment::Cold,
                waterproof: true,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_insert_with_items_keeps_order() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();
        let shoes = add_item(&db, u, "Shoes", Category::Sneaker);
        let hoodie = add_item(&db, u, "Hoodie", Category::Pullover);

        let id = insert_with_items(&db, u, "Weekend", &[shoes, hoodie]).unwrap();
        let outfit = find_with_items(&db, id).unwrap().unwrap();

        assert_eq!(outfit.outfit.outfit_name, "Weekend");
        let names: Vec<&str> = outfit.items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Shoes", "Hoodie"]);
    }

    #[test]
    fn test_insert_with_unknown_item_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();

        assert!(insert_with_items(&db, u, "Broken", &[12345]).is_err());
        assert!(list_by_user(&db, u).unwrap().is_empty());
    }

    #[test]
    fn test_replace_item_keeps_position() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();
        let coat = add_item(&db, u, "Coat", Category::Coat);
        let white = add_item(&db, u, "White", Category::Sneaker);
        let black = add_item(&db, u, "Black", Category::Sneaker);
        let id = insert_with_items(&db, u, "Fit", &[coat, white]).unwrap();

        assert!(replace_item(&db, u, id, white, black).unwrap());
        let items = items_for_outfit(&db, id).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Coat", "Black"]);

        assert!(!replace_item(&db, u, id, white, black).unwrap());
    }

    #[test]
    fn test_replace_with_linked_item_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();
        let coat = add_item(&db, u, "Coat", Category::Coat);
        let shoes = add_item(&db, u, "Shoes", Category::Sneaker);
        let id = insert_with_items(&db, u, "Fit", &[coat, shoes]).unwrap();
        assert!(contains_item(&db, id, shoes).unwrap());

        assert!(replace_item(&db, u, id, coat, shoes).is_err());
        assert_eq!(items_for_outfit(&db, id).unwrap().len(), 2);
        assert!(contains_item(&db, id, coat).unwrap());
    }

    #[test]
    fn test_replace_item_requires_owner() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();
        let other = user_repo::insert(&db, "other", None).unwrap();
        let a = add_item(&db, u, "A", Category::Bag);
        let b = add_item(&db, u, "B", Category::Bag);
        let id = insert_with_items(&db, u, "Fit", &[a]).unwrap();

        assert!(!replace_item(&db, other, id, a, b).unwrap());
    }

    #[test]
    fn test_delete_cascades_links() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();
        let a = add_item(&db, u, "A", Category::Bag);
        let id = insert_with_items(&db, u, "Fit", &[a]).unwrap();

        assert!(delete_owned(&db, u, id).unwrap());
        assert!(items_for_outfit(&db, id).unwrap().is_empty());
        assert!(item_repo::find_by_id(&db, a).unwrap().is_some());
    }

    #[test]
    fn test_likes() {
        let db = Database::open_in_memory().unwrap();
        let u = user_repo::insert(&db, "u", None).unwrap();
        let fan = user_repo::insert(&db, "fan", None).unwrap();
        let a = add_item(&db, u, "A", Category::Bag);
        let id = insert_with_items(&db, u, "Fit", &[a]).unwrap();

        like(&db, fan, id).unwrap();
        assert!(is_liked(&db, fan, id).unwrap());
        assert_eq!(like_count(&db, id).unwrap(), 1);
        unlike(&db, fan, id).unwrap();
        assert_eq!(like_count(&db, id).unwrap(), 0);
    }
}
