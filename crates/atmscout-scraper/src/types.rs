//! Raw response types for the places-search API and the ATM directory.
//!
//! ## Observed shape from the places API
//!
//! ### `status`
//! Always present. `"OK"` and `"ZERO_RESULTS"` are success; anything else
//! (`"OVER_QUERY_LIMIT"`, `"REQUEST_DENIED"`, `"INVALID_REQUEST"`) carries
//! an optional `error_message` and is surfaced as a typed error.
//!
//! ### `vicinity` vs `formatted_address`
//! Nearby search returns `vicinity` (street + neighborhood, no city); text
//! search returns `formatted_address`. Either may be absent. Normalization
//! prefers `formatted_address` and falls back to `vicinity`.
//!
//! ### `rating`
//! Absent (not null-valued) for unrated businesses. `Option<f64>`.
//!
//! ### `next_page_token`
//! Present when more pages exist; the API needs a short delay before the
//! token becomes valid, so the client sleeps between pages.

use serde::Deserialize;

/// Top-level response from the nearby-search and text-search endpoints.
#[derive(Debug, Deserialize)]
pub struct PlacesSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One business from a places search page.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    /// Stable provider ID used for cross-search dedup.
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Short address from nearby search.
    #[serde(default)]
    pub vicinity: Option<String>,
    /// Full address from text search or details.
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Provider category tags, e.g. `["gas_station", "point_of_interest"]`.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Response from the place-details endpoint (phone lookup).
#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

/// One ATM extracted from the directory site, before normalization.
///
/// Listing pages yield name/address/operator and a link to a detail page;
/// coordinates come from the detail page's map embed when present.
#[derive(Debug, Clone, Default)]
pub struct RawAtmListing {
    pub detail_url: Option<String>,
    pub operator: String,
    pub location_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
