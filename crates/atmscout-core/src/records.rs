//! Domain records shared between the scraper, analysis, and CLI crates.

use serde::{Deserialize, Serialize};

/// A scraped business being evaluated for ATM placement.
///
/// Directory data is incomplete in practice: any of the optional fields may
/// be absent, and `business_name`/`address` may be empty strings. The
/// analysis core absorbs these gaps with sentinels instead of rejecting the
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLocation {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-text category label, e.g. `"Gas Station"`.
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Star rating in `[1.0, 5.0]` when the source provides one.
    #[serde(default)]
    pub google_rating: Option<f64>,
}

impl CandidateLocation {
    /// Coordinates as a pair, or `None` if either component is missing.
    #[must_use]
    pub fn coords(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// An existing crypto-ATM installation from a directory source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmLocation {
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub address: String,
    /// Operator brand. The scraper substitutes `"Unknown"` when the
    /// directory page does not resolve one.
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl AtmLocation {
    /// Coordinates as a pair, or `None` if either component is missing.
    #[must_use]
    pub fn coords(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Outreach status of an opportunity. The analysis pass only ever writes
/// [`OpportunityStatus::NotContacted`]; the remaining variants exist so the
/// exported `status` column round-trips through downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    NotContacted,
    Contacted,
    Interested,
    Declined,
    Installed,
}

impl std::fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpportunityStatus::NotContacted => write!(f, "not_contacted"),
            OpportunityStatus::Contacted => write!(f, "contacted"),
            OpportunityStatus::Interested => write!(f, "interested"),
            OpportunityStatus::Declined => write!(f, "declined"),
            OpportunityStatus::Installed => write!(f, "installed"),
        }
    }
}

/// One analyzed candidate. Immutable after the analysis pass; status changes
/// happen in downstream tooling, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub business_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub business_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// True iff the identity resolver matched this candidate against an
    /// existing ATM record.
    pub has_competitor: bool,
    /// Operator of the matched ATM; empty when `has_competitor` is false.
    pub competitor_operator: String,
    /// Minimum great-circle distance to any ATM with coordinates. `None`
    /// only when no ATM in the set has usable coordinates.
    pub nearest_distance_km: Option<f64>,
    /// Operator of the geographically nearest ATM; empty when none.
    pub nearest_operator: String,
    pub google_rating: Option<f64>,
    /// Opportunity score in `[0, 100]`. Always 0 when `has_competitor`.
    pub score: u8,
    pub status: OpportunityStatus,
    pub notes: String,
}
