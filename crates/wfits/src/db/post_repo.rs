//! Post repository: posts, their outfits and post likes.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{now_timestamp, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRow {
    pub post_id: i64,
    pub user_id: i64,
    pub post_title: String,
    pub post_text: String,
    /// Image URLs, stored as a JSON array.
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        let images: String = row.get("images")?;
        let images = serde_json::from_str(&images).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Self {
            post_id: row.get("post_id")?,
            user_id: row.get("user_id")?,
            post_title: row.get("post_title")?,
            post_text: row.get("post_text")?,
            images,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub post_title: String,
    pub post_text: String,
    pub images: Vec<String>,
    pub outfit_ids: Vec<i64>,
}

/// Creates a post and links its outfits. Duplicate outfit ids are skipped.
pub fn insert(db: &Database, post: &NewPost) -> Result<i64, DatabaseError> {
    let images = serde_json::to_string(&post.images).map_err(|e| DatabaseError::Encode {
        column: "images".to_string(),
        reason: e.to_string(),
    })?;

    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let now = now_timestamp();
        tx.execute(
            "INSERT INTO posts (user_id, post_title, post_text, images, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![post.user_id, post.post_title, post.post_text, images, now],
        )?;
        let post_id = tx.last_insert_rowid();
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO post_outfits (post_id, outfit_id) VALUES (?1, ?2)")?;
            for outfit_id in &post.outfit_ids {
                stmt.execute(params![post_id, outfit_id])?;
            }
        }
        tx.commit()?;
        Ok(post_id)
    })
}

pub fn find_by_id(db: &Database, post_id: i64) -> Result<Option<PostRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM posts WHERE post_id = ?1",
                params![post_id],
                PostRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

pub fn outfit_ids(db: &Database, post_id: i64) -> Result<Vec<i64>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT outfit_id FROM post_outfits WHERE post_id = ?1 ORDER BY outfit_id")?;
        let ids = stmt
            .query_map(params![post_id], |r| r.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    })
}

/// Posts by the users `user_id` follows, newest first.
pub fn feed_for(db: &Database, user_id: i64, limit: u64) -> Result<Vec<PostRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT p.* FROM posts p
             JOIN follows f ON f.following_id = p.user_id
             WHERE f.follower_id = ?1
             ORDER BY p.created_at DESC, p.post_id DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit as i64], PostRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn is_liked(db: &Database, user_id: i64, post_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM post_likes WHERE user_id = ?1 AND post_id = ?2)",
            params![user_id, post_id],
            |r| r.get(0),
        )?;
        Ok(exists)
    })
}

pub fn like(db: &Database, user_id: i64, post_id: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO post_likes (user_id, post_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, post_id, now_timestamp()],
        )?;
        Ok(())
    })
}

pub fn unlike(db: &Database, user_id: i64, post_id: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "DELETE FROM post_likes WHERE user_id = ?1 AND post_id = ?2",
            params![user_id, post_id],
        )?;
        Ok(())
    })
}

pub fn like_count(db: &Database, post_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM post_likes WHERE post_id = ?1",
            params![post_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}
