//! Error type for loading plans and configuration.
//!
//! The scheduling pass itself never fails; these errors come only from the
//! outer surface (files, JSON, TOML).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plan JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config TOML error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
