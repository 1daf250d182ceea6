//! Key/value rows backing persisted wizard state.

use rusqlite::{params, OptionalExtension};

use super::{now_timestamp, Database, DatabaseError};

pub fn load(db: &Database, key: &str) -> Result<Option<String>, DatabaseError> {
    db.with_conn(|conn| {
        let value = conn
            .query_row(
                "SELECT state_value FROM wizard_state WHERE state_key = ?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(value)
    })
}

pub fn save(db: &Database, key: &str, value: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO wizard_state (state_key, state_value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(state_key) DO UPDATE SET state_value = excluded.state_value,
             updated_at = excluded.updated_at",
            params![key, value, now_timestamp()],
        )?;
        Ok(())
    })
}

pub fn clear(db: &Database, key: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute("DELETE FROM wizard_state WHERE state_key = ?1", params![key])?;
        Ok(())
    })
}
