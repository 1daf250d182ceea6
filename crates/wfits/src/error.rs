use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WfitsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] crate::wizard::WizardError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::wizard::PersistenceError),

    #[error("Action error: {0}")]
    Action(#[from] crate::actions::ActionError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Unknown category '{name}' in {field}")]
    UnknownCategory { name: String, field: String },
}

pub type Result<T> = std::result::Result<T, WfitsError>;
