//! Shared domain types and configuration for atmscout.
//!
//! Candidate businesses and existing-ATM installations enter the system as
//! typed records with explicit optional fields; the loose key/value shapes
//! produced by scraping are validated at the scraper boundary, never inside
//! the analysis core.

mod app_config;
mod config;
mod markets;
mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use markets::{load_markets, MarketConfig, MarketsFile};
pub use records::{AtmLocation, CandidateLocation, OpportunityRecord, OpportunityStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read markets file {path}: {source}")]
    MarketsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse markets file: {0}")]
    MarketsFileParse(#[from] serde_yaml::Error),

    #[error("markets validation failed: {0}")]
    Validation(String),
}
