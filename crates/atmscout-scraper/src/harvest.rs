//! Per-market scrape orchestration for the candidate-business feed.
//!
//! Runs one nearby search per configured business type and one text search
//! per keyword, deduplicates across all of them, classifies each result,
//! then backfills phone numbers from the details endpoint.

use std::collections::HashSet;
use std::time::Duration;

use atmscout_core::{CandidateLocation, MarketConfig};

use crate::error::ScraperError;
use crate::normalize::{
    candidate_from_place, classify_business, label_from_keyword, label_from_place_type,
    make_location_key, BusinessClass,
};
use crate::places::PlacesClient;
use crate::types::PlaceResult;

const PROGRESS_INTERVAL: usize = 10;

/// Scrapes every candidate business for one market.
///
/// Results are deduplicated by provider place ID where available, falling
/// back to a name/address hash. Non-retail venues are dropped during
/// classification; unclassified survivors take a category inferred from the
/// search that found them.
///
/// # Errors
///
/// Propagates search failures; a failed details lookup for one place is
/// logged and skipped.
pub async fn harvest_candidates(
    client: &PlacesClient,
    market: &MarketConfig,
    inter_request_delay_ms: u64,
) -> Result<Vec<CandidateLocation>, ScraperError> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<(Option<String>, CandidateLocation)> = Vec::new();
    let center = (market.center.lat, market.center.lng);

    for place_type in &market.business_types {
        tracing::info!(market = %market.name, place_type, "nearby search");
        let results = client
            .search_nearby(center, market.radius_meters, place_type)
            .await?;
        for place in &results {
            let Some(label) = accept(place, &mut seen, || label_from_place_type(place_type))
            else {
                continue;
            };
            candidates.push((place.place_id.clone(), candidate_from_place(place, &label)));
        }
    }

    for keyword in &market.keywords {
        tracing::info!(market = %market.name, keyword, "text search");
        let results = client.search_text(keyword).await?;
        for place in &results {
            let Some(label) = accept(place, &mut seen, || label_from_keyword(keyword)) else {
                continue;
            };
            candidates.push((place.place_id.clone(), candidate_from_place(place, &label)));
        }
    }

    tracing::info!(
        market = %market.name,
        candidates = candidates.len(),
        "candidate searches complete"
    );

    backfill_phones(client, &mut candidates, inter_request_delay_ms).await;

    Ok(candidates.into_iter().map(|(_, c)| c).collect())
}

/// Dedup + classification gate for one search result. Returns the category
/// label to record the place under, or `None` to drop it.
fn accept(
    place: &PlaceResult,
    seen: &mut HashSet<String>,
    fallback_label: impl FnOnce() -> String,
) -> Option<String> {
    let key = place
        .place_id
        .clone()
        .unwrap_or_else(|| make_location_key(&place.name, place.vicinity.as_deref().unwrap_or("")));
    if !seen.insert(key) {
        return None;
    }

    match classify_business(&place.types, &place.name) {
        BusinessClass::Excluded => None,
        BusinessClass::Retail(label) => Some(label),
        BusinessClass::Unclassified => Some(fallback_label()),
    }
}

/// Fetches details for candidates missing a phone number, also upgrading
/// their address when the details endpoint returns a fuller one.
async fn backfill_phones(
    client: &PlacesClient,
    candidates: &mut [(Option<String>, CandidateLocation)],
    inter_request_delay_ms: u64,
) {
    let total = candidates.len();
    let mut found = 0usize;

    for (i, (place_id, candidate)) in candidates.iter_mut().enumerate() {
        if candidate.phone.is_some() {
            continue;
        }
        let Some(place_id) = place_id.as_deref() else {
            continue;
        };

        match client.place_details(place_id).await {
            Ok(Some(details)) => {
                candidate.phone = details.formatted_phone_number.filter(|p| !p.is_empty());
                if let Some(addr) = details.formatted_address.filter(|a| !a.is_empty()) {
                    candidate.address = addr;
                }
                if candidate.phone.is_some() {
                    found += 1;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(place_id, error = %e, "details lookup failed — skipping");
            }
        }

        if (i + 1) % PROGRESS_INTERVAL == 0 {
            tracing::info!(processed = i + 1, total, "phone backfill progress");
        }
        tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
    }

    tracing::info!(phones_found = found, "phone backfill complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, place_id: Option<&str>, types: &[&str]) -> PlaceResult {
        PlaceResult {
            place_id: place_id.map(str::to_owned),
            name: name.to_owned(),
            vicinity: Some("12 NE 1st Ave".to_owned()),
            formatted_address: None,
            geometry: None,
            rating: None,
            types: types.iter().map(|s| (*s).to_owned()).collect(),
            business_status: None,
        }
    }

    #[test]
    fn accept_drops_duplicate_place_ids() {
        let mut seen = HashSet::new();
        let p = place("QuickBuy", Some("abc"), &["convenience_store"]);
        assert!(accept(&p, &mut seen, || "X".to_owned()).is_some());
        assert!(accept(&p, &mut seen, || "X".to_owned()).is_none());
    }

    #[test]
    fn accept_dedups_idless_places_by_name_and_address() {
        let mut seen = HashSet::new();
        let p = place("QuickBuy", None, &["convenience_store"]);
        assert!(accept(&p, &mut seen, || "X".to_owned()).is_some());
        assert!(accept(&p.clone(), &mut seen, || "X".to_owned()).is_none());
    }

    #[test]
    fn accept_drops_excluded_venues() {
        let mut seen = HashSet::new();
        let p = place("Ocean Grill", Some("r1"), &["restaurant"]);
        assert!(accept(&p, &mut seen, || "X".to_owned()).is_none());
        // Exclusion does not block a later distinct place.
        let q = place("QuickBuy", Some("q1"), &["convenience_store"]);
        assert_eq!(
            accept(&q, &mut seen, || "X".to_owned()).as_deref(),
            Some("Convenience Store")
        );
    }

    #[test]
    fn accept_uses_fallback_label_for_unclassified() {
        let mut seen = HashSet::new();
        let p = place("Acme", Some("a1"), &["point_of_interest"]);
        assert_eq!(
            accept(&p, &mut seen, || "Liquor Store".to_owned()).as_deref(),
            Some("Liquor Store")
        );
    }
}
