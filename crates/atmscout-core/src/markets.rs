use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Geographic center of a market's search area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketCenter {
    pub lat: f64,
    pub lng: f64,
}

/// One metro market to scan for placement opportunities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Display name, e.g. `"Miami, FL"`.
    pub name: String,
    pub center: MarketCenter,
    /// Places-search radius in meters around `center`.
    pub radius_meters: u32,
    /// Text-search keywords, e.g. `"smoke shop Miami"`.
    pub keywords: Vec<String>,
    /// Typed category filters for nearby search, e.g. `"gas_station"`.
    #[serde(default)]
    pub business_types: Vec<String>,
    /// City listing page on the ATM directory site.
    pub directory_url: String,
}

impl MarketConfig {
    /// Generate a URL-safe slug from the market name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct MarketsFile {
    pub markets: Vec<MarketConfig>,
}

/// Load and validate the markets configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_markets(path: &Path) -> Result<MarketsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MarketsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let markets_file: MarketsFile = serde_yaml::from_str(&content)?;

    validate_markets(&markets_file)?;

    Ok(markets_file)
}

fn validate_markets(markets_file: &MarketsFile) -> Result<(), ConfigError> {
    if markets_file.markets.is_empty() {
        return Err(ConfigError::Validation(
            "markets file defines no markets".to_string(),
        ));
    }

    let mut seen_slugs = HashSet::new();

    for market in &markets_file.markets {
        if market.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "market name must be non-empty".to_string(),
            ));
        }

        if market.radius_meters == 0 {
            return Err(ConfigError::Validation(format!(
                "market '{}' has zero search radius",
                market.name
            )));
        }

        if !(-90.0..=90.0).contains(&market.center.lat)
            || !(-180.0..=180.0).contains(&market.center.lng)
        {
            return Err(ConfigError::Validation(format!(
                "market '{}' has out-of-range center ({}, {})",
                market.name, market.center.lat, market.center.lng
            )));
        }

        if market.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "market '{}' has no search keywords",
                market.name
            )));
        }

        let slug = market.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate market slug: '{}' (from market '{}')",
                slug, market.name
            )));
        }
    }

    Ok(())
}
