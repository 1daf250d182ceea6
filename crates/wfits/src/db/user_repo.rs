//! User repository: accounts and the follow graph.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{now_timestamp, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub name: Option<String>,
    pub profile_photo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
            username: row.get("username")?,
            name: row.get("name")?,
            profile_photo: row.get("profile_photo")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts a user and returns the new id.
pub fn insert(db: &Database, username: &str, name: Option<&str>) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO users (username, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![username, name, now],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

pub fn username_taken(db: &Database, username: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
            params![username],
            |r| r.get(0),
        )?;
        Ok(exists)
    })
}

pub fn find_by_id(db: &Database, user_id: i64) -> Result<Option<UserRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM users WHERE user_id = ?1",
                params![user_id],
                UserRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

pub fn find_by_username(db: &Database, username: &str) -> Result<Option<UserRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM users WHERE username = ?1",
                params![username],
                UserRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Updates the display name. Returns false when the user does not exist.
pub fn update_name(db: &Database, user_id: i64, name: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE users SET name = ?2, updated_at = ?3 WHERE user_id = ?1",
            params![user_id, name, now_timestamp()],
        )?;
        Ok(changed > 0)
    })
}

pub fn update_profile_photo(db: &Database, user_id: i64, url: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE users SET profile_photo = ?2, updated_at = ?3 WHERE user_id = ?1",
            params![user_id, url, now_timestamp()],
        )?;
        Ok(changed > 0)
    })
}

pub fn is_following(db: &Database, follower_id: i64, following_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND following_id = ?2)",
            params![follower_id, following_id],
            |r| r.get(0),
        )?;
        Ok(exists)
    })
}

pub fn follow(db: &Database, follower_id: i64, following_id: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO follows (follower_id, following_id, created_at) VALUES (?1, ?2, ?3)",
            params![follower_id, following_id, now_timestamp()],
        )?;
        Ok(())
    })
}

pub fn unfollow(db: &Database, follower_id: i64, following_id: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "DELETE FROM follows WHERE follower_id = ?1 AND following_id = ?2",
            params![follower_id, following_id],
        )?;
        Ok(())
    })
}

/// Returns (followers, following) counts for a user.
pub fn follow_counts(db: &Database, user_id: i64) -> Result<(u64, u64), DatabaseError> {
    db.with_conn(|conn| {
        let followers: u64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE following_id = ?1",
            params![user_id],
            |r| r.get(0),
        )?;
        let following: u64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
            params![user_id],
            |r| r.get(0),
        )?;
        Ok((followers, following))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let id = insert(&db, "ada", Some("Ada L")).unwrap();

        let user = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.name.as_deref(), Some("Ada L"));
        assert_eq!(find_by_username(&db, "ada").unwrap().unwrap().user_id, id);
        assert!(find_by_id(&db, id + 100).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, "ada", None).unwrap();
        assert!(username_taken(&db, "ada").unwrap());
        assert!(!username_taken(&db, "Ada").unwrap());
        assert!(insert(&db, "ada", None).is_err());
    }

    #[test]
    fn test_follow_unfollow() {
        let db = Database::open_in_memory().unwrap();
        let a = insert(&db, "a", None).unwrap();
        let b = insert(&db, "b", None).unwrap();

        assert!(!is_following(&db, a, b).unwrap());
        follow(&db, a, b).unwrap();
        follow(&db, a, b).unwrap();
        assert!(is_following(&db, a, b).unwrap());
        assert!(!is_following(&db, b, a).unwrap());
        assert_eq!(follow_counts(&db, b).unwrap(), (1, 0));
        assert_eq!(follow_counts(&db, a).unwrap(), (0, 1));

        unfollow(&db, a, b).unwrap();
        assert!(!is_following(&db, a, b).unwrap());
    }

    #[test]
    fn test_update_name() {
        let db = Database::open_in_memory().unwrap();
        let id = insert(&db, "ada", None).unwrap();
        assert!(update_name(&db, id, "Ada").unwrap());
        assert!(!update_name(&db, id + 1, "Nobody").unwrap());
        assert_eq!(find_by_id(&db, id).unwrap().unwrap().name.as_deref(), Some("Ada"));
    }
}
