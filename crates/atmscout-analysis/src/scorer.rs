//! Opportunity scoring rubric.
//!
//! Four independent point buckets — nearest-competitor distance, rating,
//! business category, and contact availability — summed and clamped to the
//! maximum. Distance scoring peaks in the 1–3 km band: too close means an
//! oversaturated block, too far means unproven demand. A candidate that
//! already hosts a machine scores zero outright.

use atmscout_core::CandidateLocation;

/// Bucket tables and thresholds for the scoring rubric. All tables are
/// explicit configuration so unit tests can override individual buckets.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Descending `(min_distance_km, points)` ladder; the first threshold
    /// `d >= min_distance_km` wins. Distances below every threshold score 0.
    pub distance_ladder: Vec<(f64, u32)>,
    /// Points when no competitor distance is known (infinite sentinel).
    pub unknown_distance_points: u32,
    /// Descending `(min_rating, points)` ladder; first match wins.
    pub rating_ladder: Vec<(f64, u32)>,
    /// Points for a rating below every ladder threshold.
    pub low_rating_points: u32,
    /// Points when the record has no rating at all.
    pub missing_rating_points: u32,
    /// Ordered `(category substring, points)` table, matched
    /// case-insensitively against the business type; first match wins.
    pub category_table: Vec<(&'static str, u32)>,
    /// Points for a business type matching no table entry.
    pub default_category_points: u32,
    /// Bonus for a non-empty phone number.
    pub phone_points: u32,
    /// Upper bound on the final score.
    pub max_score: u32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            distance_ladder: vec![(3.0, 40), (1.0, 35), (0.5, 25), (0.2, 10)],
            unknown_distance_points: 30,
            rating_ladder: vec![(4.5, 25), (4.0, 20), (3.5, 15), (3.0, 10)],
            low_rating_points: 5,
            missing_rating_points: 10,
            category_table: vec![
                // High traffic, long hours first.
                ("gas station", 25),
                ("convenience store", 23),
                ("smoke shop", 20),
                ("liquor store", 18),
                ("bodega", 18),
                ("grocery", 15),
            ],
            default_category_points: 12,
            phone_points: 10,
            max_score: 100,
        }
    }
}

/// Score one candidate in `[0, max_score]`.
///
/// `has_competitor` short-circuits to 0. `nearest_distance_km` uses
/// `f64::INFINITY` as the unknown sentinel, matching
/// [`crate::nearest::find_nearest`].
#[must_use]
pub fn score(
    config: &ScorerConfig,
    candidate: &CandidateLocation,
    has_competitor: bool,
    nearest_distance_km: f64,
) -> u8 {
    if has_competitor {
        return 0;
    }

    let mut total = distance_points(config, nearest_distance_km);
    total += rating_points(config, candidate.google_rating);
    total += category_points(config, &candidate.business_type);
    if candidate.phone.as_deref().is_some_and(|p| !p.is_empty()) {
        total += config.phone_points;
    }

    let clamped = total.min(config.max_score);
    // max_score is validated nowhere above 100 in practice; saturate anyway
    // so an oversized config cannot wrap.
    u8::try_from(clamped).unwrap_or(u8::MAX)
}

fn distance_points(config: &ScorerConfig, distance_km: f64) -> u32 {
    if distance_km.is_infinite() {
        return config.unknown_distance_points;
    }
    for &(threshold, points) in &config.distance_ladder {
        if distance_km >= threshold {
            return points;
        }
    }
    0
}

fn rating_points(config: &ScorerConfig, rating: Option<f64>) -> u32 {
    let Some(rating) = rating else {
        return config.missing_rating_points;
    };
    for &(threshold, points) in &config.rating_ladder {
        if rating >= threshold {
            return points;
        }
    }
    config.low_rating_points
}

fn category_points(config: &ScorerConfig, business_type: &str) -> u32 {
    let lower = business_type.to_lowercase();
    for &(key, points) in &config.category_table {
        if lower.contains(key) {
            return points;
        }
    }
    config.default_category_points
}
