//! Database migration system.
//!
//! Tracks applied migrations in a `_migrations` table and applies
//! pending ones in order. Tag tables are seeded from the static catalog
//! so their ids always match [`crate::catalog`].

use rusqlite::{params, Connection};

use super::error::DatabaseError;
use crate::catalog::{Category, Size, CATEGORY_REGISTRY, COLOURS};

/// A single migration definition.
struct Migration {
    version: u32,
    description: &'static str,
    kind: MigrationKind,
}

enum MigrationKind {
    /// Execute the SQL directly.
    Sql(&'static str),
    /// Insert catalog rows that are not yet present.
    Seed(fn(&Connection) -> Result<(), DatabaseError>),
}

/// All migrations in order. Each is applied at most once.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_tag_tables",
        kind: MigrationKind::Sql(include_str!("sql/001_create_tags.sql")),
    },
    Migration {
        version: 2,
        description: "seed_tag_tables",
        kind: MigrationKind::Seed(seed_tags),
    },
    Migration {
        version: 3,
        description: "create_users_and_follows",
        kind: MigrationKind::Sql(include_str!("sql/002_create_users.sql")),
    },
    Migration {
        version: 4,
        description: "create_items_table",
        kind: MigrationKind::Sql(include_str!("sql/003_create_items.sql")),
    },
    Migration {
        version: 5,
        description: "create_outfits_tables",
        kind: MigrationKind::Sql(include_str!("sql/004_create_outfits.sql")),
    },
    Migration {
        version: 6,
        description: "create_posts_and_likes",
        kind: MigrationKind::Sql(include_str!("sql/005_create_posts.sql")),
    },
    Migration {
        version: 7,
        description: "create_wizard_state_table",
        kind: MigrationKind::Sql(include_str!("sql/006_create_wizard_state.sql")),
    },
];

/// Runs all pending migrations on the given connection.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        log::info!(
            "Running migration v{}: {}",
            migration.version,
            migration.description
        );

        let applied = match &migration.kind {
            MigrationKind::Sql(sql) => conn.execute_batch(sql).map_err(DatabaseError::from),
            MigrationKind::Seed(seed) => seed(conn),
        };
        applied.map_err(|e| DatabaseError::Migration {
            version: migration.version,
            reason: e.to_string(),
        })?;

        conn.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            params![migration.version, migration.description],
        )?;
    }

    Ok(())
}

fn seed_tags(conn: &Connection) -> Result<(), DatabaseError> {
    for entry in CATEGORY_REGISTRY {
        conn.execute(
            "INSERT OR IGNORE INTO category_tags (category_id, category_name) VALUES (?1, ?2)",
            params![entry.id, entry.name],
        )?;
    }
    for colour in COLOURS {
        conn.execute(
            "INSERT OR IGNORE INTO colour_tags (colour_id, colour_name, colour_value) VALUES (?1, ?2, ?3)",
            params![colour.id, colour.name, colour.value],
        )?;
    }
    for size in Size::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO size_tags (size_id, size_name) VALUES (?1, ?2)",
            params![size.id(), size.name()],
        )?;
    }
    log::debug!(
        "Seeded {} categories, {} colours, {} sizes",
        Category::all().count(),
        COLOURS.len(),
        Size::ALL.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        conn
    }

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = fresh();
        run_all(&conn).unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as u32);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = fresh();
        run_all(&conn).unwrap();
        run_all(&conn).unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as u32);
    }

    #[test]
    fn test_versions_are_strictly_increasing() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[test]
    fn test_category_tags_use_catalog_ids() {
        let conn = fresh();
        run_all(&conn).unwrap();

        for entry in CATEGORY_REGISTRY {
            let name: String = conn
                .query_row(
                    "SELECT category_name FROM category_tags WHERE category_id = ?1",
                    [entry.id],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(name, entry.name);
        }
    }

    #[test]
    fn test_colour_and_size_tags_seeded() {
        let conn = fresh();
        run_all(&conn).unwrap();

        let colours: u32 = conn
            .query_row("SELECT COUNT(*) FROM colour_tags", [], |r| r.get(0))
            .unwrap();
        let sizes: u32 = conn
            .query_row("SELECT COUNT(*) FROM size_tags", [], |r| r.get(0))
            .unwrap();
        assert_eq!(colours as usize, COLOURS.len());
        assert_eq!(sizes, 5);
    }

    #[test]
    fn test_item_environment_is_constrained() {
        let conn = fresh();
        run_all(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (username, created_at, updated_at) VALUES ('u', 'now', 'now')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO items (user_id, item_name, item_url, category_id, colour_id, size_id, slot, environment, created_at, updated_at)
             VALUES (1, 'x', 'u', 0, 0, 0, 3, 'Humid', 'now', 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
