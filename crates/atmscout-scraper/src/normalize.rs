//! Normalization of raw scrape results into the analysis record types.
//!
//! Two jobs: classify candidate businesses into the retail categories the
//! scorer knows about (filtering out non-retail venues entirely), and
//! flatten raw API/directory payloads into [`CandidateLocation`] /
//! [`AtmLocation`] rows.

use atmscout_core::{AtmLocation, CandidateLocation};
use sha2::{Digest, Sha256};

use crate::types::{PlaceResult, RawAtmListing};

/// Provider category tags that mark a venue as non-retail. Any overlap
/// disqualifies the place outright.
const EXCLUDED_PROVIDER_TYPES: &[&str] = &[
    "restaurant",
    "bar",
    "night_club",
    "lodging",
    "hotel",
    "hospital",
    "school",
    "university",
    "church",
    "courthouse",
    "lawyer",
    "doctor",
    "real_estate_agency",
    "apartment",
    "gym",
    "spa",
    "salon",
    "bank",
    "insurance_agency",
    "car_dealer",
    "car_rental",
    "parking",
];

/// Name fragments that mark a venue as non-retail even when its type tags
/// look acceptable. Some entries carry deliberate spaces ("bar " vs
/// "barbershop").
const EXCLUDED_NAME_KEYWORDS: &[&str] = &[
    "hotel",
    "inn ",
    " inn",
    "suites",
    "resort",
    "motel",
    "restaurant",
    "grill",
    "steakhouse",
    "seafood",
    "kitchen",
    "bistro",
    "cafe",
    "diner",
    "bar ",
    " bar",
    "pub ",
    " pub",
    "lounge",
    "tavern",
    "brewery",
    "honorable",
    "judge",
    "court",
    "attorney",
    "law office",
    "college",
    "university",
    "school",
    "academy",
    "hospital",
    "clinic",
    "medical",
    "dental",
    "church",
    "temple",
    "mosque",
    "apartment",
    "condo",
    "realty",
    "real estate",
    "yacht",
    "charter",
    "cruise",
    "arena",
    "stadium",
    "center",
];

const SMOKE_SHOP_KEYWORDS: &[&str] = &["smoke", "vape", "tobacco", "cigar", "hookah"];

const BODEGA_KEYWORDS: &[&str] = &["bodega", "deli", "mini mart", "minimart", "corner store"];

const GAS_STATION_KEYWORDS: &[&str] = &[
    "gas",
    "fuel",
    "shell",
    "chevron",
    "exxon",
    "mobil",
    "bp ",
    "citgo",
    "marathon",
    "sunoco",
    "speedway",
    "wawa",
    "racetrac",
    "7-eleven",
    "7 eleven",
    "circle k",
];

/// Classification outcome for a scraped business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessClass {
    /// Non-retail venue — dropped before analysis.
    Excluded,
    /// A concrete retail category label, e.g. `"Smoke Shop"`.
    Retail(String),
    /// No signal either way; the caller picks a label from search context.
    Unclassified,
}

/// Classifies a business from its provider type tags and display name.
///
/// Exclusion runs first: type-tag overlap with the non-retail list, then
/// name-keyword overlap. Surviving businesses are matched against
/// name-keyword categories (smoke shop, bodega, gas station) before falling
/// back to the provider's own type tags.
#[must_use]
pub fn classify_business(types: &[String], business_name: &str) -> BusinessClass {
    let name_lower = business_name.to_lowercase();

    if types
        .iter()
        .any(|t| EXCLUDED_PROVIDER_TYPES.contains(&t.as_str()))
    {
        return BusinessClass::Excluded;
    }
    if EXCLUDED_NAME_KEYWORDS.iter().any(|kw| name_lower.contains(kw)) {
        return BusinessClass::Excluded;
    }

    if SMOKE_SHOP_KEYWORDS.iter().any(|kw| name_lower.contains(kw)) {
        return BusinessClass::Retail("Smoke Shop".to_owned());
    }
    if BODEGA_KEYWORDS.iter().any(|kw| name_lower.contains(kw)) {
        return BusinessClass::Retail("Bodega".to_owned());
    }
    if GAS_STATION_KEYWORDS.iter().any(|kw| name_lower.contains(kw)) {
        return BusinessClass::Retail("Gas Station".to_owned());
    }

    for t in types {
        let label = match t.as_str() {
            "gas_station" => "Gas Station",
            "convenience_store" | "store" => "Convenience Store",
            "grocery_or_supermarket" | "supermarket" => "Grocery/Bodega",
            _ => continue,
        };
        return BusinessClass::Retail(label.to_owned());
    }

    BusinessClass::Unclassified
}

/// Fallback category for an unclassified result from a type-based nearby
/// search, e.g. `"convenience_store"` becomes `"Convenience Store"`.
#[must_use]
pub fn label_from_place_type(place_type: &str) -> String {
    place_type
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fallback category for an unclassified result from a keyword text search.
#[must_use]
pub fn label_from_keyword(keyword: &str) -> String {
    let kw = keyword.to_lowercase();
    if kw.contains("bodega") || kw.contains("corner") {
        "Bodega".to_owned()
    } else if kw.contains("gas") {
        "Gas Station".to_owned()
    } else {
        "Convenience Store".to_owned()
    }
}

/// Flattens one places-API result into a candidate row under the given
/// category label.
///
/// `formatted_address` wins over `vicinity`; empty phone strings collapse
/// to `None` so downstream scoring treats them as missing.
#[must_use]
pub fn candidate_from_place(place: &PlaceResult, business_type: &str) -> CandidateLocation {
    let address = place
        .formatted_address
        .clone()
        .or_else(|| place.vicinity.clone())
        .unwrap_or_default();
    let (latitude, longitude) = place
        .geometry
        .as_ref()
        .map_or((None, None), |g| (Some(g.location.lat), Some(g.location.lng)));

    CandidateLocation {
        business_name: if place.name.is_empty() {
            "Unknown".to_owned()
        } else {
            place.name.clone()
        },
        address,
        phone: None,
        business_type: business_type.to_owned(),
        latitude,
        longitude,
        google_rating: place.rating,
    }
}

/// Flattens one raw directory listing into an ATM row. Operators the
/// directory did not name become `"Unknown"`.
#[must_use]
pub fn atm_from_listing(raw: &RawAtmListing) -> AtmLocation {
    AtmLocation {
        location_name: raw.location_name.clone(),
        address: raw.address.clone(),
        operator: if raw.operator.trim().is_empty() {
            "Unknown".to_owned()
        } else {
            raw.operator.clone()
        },
        latitude: raw.latitude,
        longitude: raw.longitude,
    }
}

/// Stable dedup key for a scraped location: SHA-256 over the lowercased
/// name and address. Used when a provider ID is unavailable.
#[must_use]
pub fn make_location_key(name: &str, address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.to_lowercase().as_bytes());
    hasher.update(b"|");
    hasher.update(address.to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}
