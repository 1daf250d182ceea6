use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::categorizer::{OutfitCategorizer, DISPLAY_ORDER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WfitsConfig {
    pub version: String,
    /// Defaults to `~/.wfits/data/wfits.db` when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for WfitsConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            logging: LoggingConfig::default(),
            wizard: WizardConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl WfitsConfig {
    pub fn resolved_database_path(&self) -> Option<PathBuf> {
        self.database_path
            .clone()
            .or_else(crate::db::default_database_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    "wfits.wizard".to_string()
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

impl WizardConfig {
    /// Store key for one flow, e.g. `wfits.wizard.upload`.
    pub fn store_key(&self, flow: &str) -> String {
        format!("{}.{}", self.key_prefix, flow)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_order")]
    pub order: Vec<String>,
}

fn default_order() -> Vec<String> {
    DISPLAY_ORDER.iter().map(|c| c.name().to_string()).collect()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
        }
    }
}

impl DisplayConfig {
    /// Resolved categories; unknown names are skipped here and rejected by
    /// config validation.
    pub fn categories(&self) -> Vec<Category> {
        self.order
            .iter()
            .filter_map(|name| Category::from_name(name))
            .collect()
    }

    pub fn categorizer(&self) -> OutfitCategorizer {
        OutfitCategorizer::new(self.categories())
    }
}
