pub mod actions;
pub mod catalog;
pub mod categorizer;
pub mod config;
pub mod db;
pub mod error;
pub mod telemetry;
pub mod wizard;

pub use actions::{ActionError, ActionResult, Session, WardrobeActions};
pub use catalog::{Category, Slot};
pub use categorizer::{categorize, sort_by_display_order, Categorized, OutfitCategorizer};
pub use config::{load_config, WfitsConfig};
pub use db::Database;
pub use error::{ConfigError, Result, WfitsError};
pub use telemetry::init_logging;
pub use wizard::{StepDescriptor, Transition, Wizard, WizardError, WizardStore};
