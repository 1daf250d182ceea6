//! Config file loading and the services built from it.

mod common;

use std::fs;

use common::{item, TestHarness, UploadBuilder};
use wfits::actions::WardrobeActions;
use wfits::catalog::Category;
use wfits::{load_config, ConfigError, Database};

#[test]
fn test_load_config_file_and_open_database() {
    let harness = TestHarness::new();
    let db_path = harness.temp_path().join("custom").join("closet.db");
    let config_path = harness.temp_path().join("wfits.json");
    fs::write(
        &config_path,
        format!(
            r#"{{
                "version": "1.0",
                "database_path": {},
                "logging": {{ "level": "debug", "json": true }},
                "wizard": {{ "key_prefix": "closet" }}
            }}"#,
            serde_json::to_string(&db_path).unwrap()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert_eq!(config.wizard.store_key("upload"), "closet.upload");
    assert_eq!(config.resolved_database_path(), Some(db_path.clone()));

    Database::open(&db_path).unwrap();
    assert!(db_path.exists());
}

#[test]
fn test_display_order_from_config_drives_outfit_layout() {
    let harness = TestHarness::new();
    let config_path = harness.temp_path().join("wfits.json");
    fs::write(
        &config_path,
        r#"{ "version": "1.0", "display": { "order": ["Bag", "Sneaker", "Coat"] } }"#,
    )
    .unwrap();
    let config = load_config(&config_path).unwrap();

    let categorizer = config.display.categorizer();
    let buckets = categorizer.sort_by_display_order(categorizer.categorize(vec![
        item("parka", "Coat"),
        item("tote", "Bag"),
        item("tee", "T-shirt/top"),
    ]));
    let keys: Vec<Category> = buckets.keys().copied().take(3).collect();
    assert_eq!(keys, vec![Category::Bag, Category::Sneaker, Category::Coat]);

    let actions = WardrobeActions::with_categorizer(harness.db.clone(), categorizer);
    let session = harness.sign_up("ada");
    let ids: Vec<i64> = [("Parka", "Coat"), ("Tote", "Bag")]
        .iter()
        .map(|(name, category)| {
            harness
                .upload(&session, UploadBuilder::new(name, category).build())
                .item_id
        })
        .collect();
    let outfit = actions
        .create_outfit(&session, "Commute", &ids)
        .into_payload()
        .unwrap();
    let display = actions
        .display_outfit(outfit.outfit.outfit_id)
        .into_payload()
        .unwrap();

    let keys: Vec<Category> = display.buckets.keys().copied().collect();
    assert_eq!(keys, vec![Category::Bag, Category::Coat]);
    assert_eq!(display.missing, vec![Category::Sneaker]);
}

/// Represents a config file that must be rejected.
struct RejectCase {
    name: &'static str,
    content: &'static str,
}

const REJECT_CASES: &[RejectCase] = &[
    RejectCase {
        name: "missing_version",
        content: r#"{ "logging": { "level": "info" } }"#,
    },
    RejectCase {
        name: "unknown_display_category",
        content: r#"{ "version": "1.0", "display": { "order": ["Hat"] } }"#,
    },
    RejectCase {
        name: "empty_database_path",
        content: r#"{ "version": "1.0", "database_path": "" }"#,
    },
    RejectCase {
        name: "not_json",
        content: "version = 1.0",
    },
];

#[test]
fn test_rejected_config_files() {
    let harness = TestHarness::new();

    for case in REJECT_CASES {
        let path = harness.temp_path().join(format!("{}.json", case.name));
        fs::write(&path, case.content).unwrap();
        assert!(load_config(&path).is_err(), "Test '{}': must be rejected", case.name);
    }
}

#[test]
fn test_missing_config_file_reports_path() {
    let harness = TestHarness::new();
    let path = harness.temp_path().join("absent.json");

    match load_config(&path) {
        Err(ConfigError::ReadFile { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ReadFile error, got {:?}", other),
    }
}
