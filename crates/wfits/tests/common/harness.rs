//! Test harness backed by a file database in a temp directory.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use wfits::actions::{ItemUpload, Session, WardrobeActions};
use wfits::db::item_repo::ItemRecord;
use wfits::db::Database;

pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
    pub actions: WardrobeActions,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("wfits.db");
        let db = Database::open(&db_path).expect("Failed to open database");
        let actions = WardrobeActions::new(db.clone());

        Self {
            temp_dir,
            db_path,
            db,
            actions,
        }
    }

    /// Creates a user and returns a session for them.
    pub fn sign_up(&self, username: &str) -> Session {
        let result = self.actions.create_user(username);
        assert!(result.success, "sign-up failed: {:?}", result.error);
        Session::signed_in(result.into_payload().expect("user payload").user_id)
    }

    pub fn upload(&self, session: &Session, upload: ItemUpload) -> ItemRecord {
        let result = self.actions.create_item(session, &upload);
        assert!(result.success, "upload failed: {:?}", result.error);
        result.into_payload().expect("upload payload")
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}
