//! Fuzzy identity resolution between a candidate business and existing ATMs.
//!
//! Directory and crawled data share no stable join key, so identity is
//! inferred from cheap, explainable heuristics layered from most to least
//! specific text signal, falling back to physical proximity. The rules are
//! an explicit ordered list so their priority and tie-break behavior stay
//! auditable and independently testable.

use std::collections::HashSet;

use atmscout_core::{AtmLocation, CandidateLocation};

use crate::geo::distance_km;

/// Name tokens too generic to count as evidence of shared identity.
const DEFAULT_STOPWORDS: &[&str] = &["the", "a", "of", "and", "&", "store", "shop"];

/// Tunable thresholds for identity resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Words excluded from the shared-significant-words rule.
    pub stopwords: HashSet<String>,
    /// Minimum significant-word overlap for [`MatchRule::SharedWords`].
    pub min_shared_words: usize,
    /// Distance below which two coordinate pairs are treated as the same
    /// physical site (50 m by default).
    pub proximity_km: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| (*s).to_string()).collect(),
            min_shared_words: 2,
            proximity_km: 0.05,
        }
    }
}

/// The heuristics tried against each ATM record, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Either name is a non-empty case-insensitive substring of the other.
    NameContainment,
    /// The names share at least `min_shared_words` significant words.
    SharedWords,
    /// The before-first-comma address segments are equal after trimming and
    /// lowercasing.
    StreetSegment,
    /// Both records have coordinates within `proximity_km` of each other.
    Proximity,
}

/// Rule evaluation order. All rules are tried against one ATM before moving
/// to the next, so priority is per-ATM-local: a low-priority rule firing on
/// an early ATM beats a high-priority rule on a later one.
const RULES: [MatchRule; 4] = [
    MatchRule::NameContainment,
    MatchRule::SharedWords,
    MatchRule::StreetSegment,
    MatchRule::Proximity,
];

/// A successful identity match: which ATM operator and which rule fired.
#[derive(Debug, Clone)]
pub struct IdentityMatch {
    pub operator: String,
    pub rule: MatchRule,
}

impl MatchRule {
    fn matches(
        self,
        config: &ResolverConfig,
        candidate: &CandidateLocation,
        atm: &AtmLocation,
    ) -> bool {
        match self {
            MatchRule::NameContainment => {
                let cand = candidate.business_name.to_lowercase();
                let atm_name = atm.location_name.to_lowercase();
                !cand.is_empty()
                    && !atm_name.is_empty()
                    && (cand.contains(&atm_name) || atm_name.contains(&cand))
            }
            MatchRule::SharedWords => {
                let cand = significant_words(&candidate.business_name, &config.stopwords);
                let atm_words = significant_words(&atm.location_name, &config.stopwords);
                !cand.is_empty()
                    && !atm_words.is_empty()
                    && cand.intersection(&atm_words).count() >= config.min_shared_words
            }
            MatchRule::StreetSegment => {
                let cand = street_segment(&candidate.address);
                let atm_seg = street_segment(&atm.address);
                !cand.is_empty() && !atm_seg.is_empty() && cand == atm_seg
            }
            MatchRule::Proximity => {
                candidate.coords().is_some()
                    && atm.coords().is_some()
                    && distance_km(candidate.coords(), atm.coords()) < config.proximity_km
            }
        }
    }
}

/// Decide whether `candidate` is the same physical site as any ATM in `atms`.
///
/// ATMs are scanned in input order; for each ATM, the rules in [`RULES`] are
/// tried in order, and the first ATM/rule combination that fires wins — no
/// further records are scanned. Returns `None` when nothing matches.
#[must_use]
pub fn resolve_identity(
    config: &ResolverConfig,
    candidate: &CandidateLocation,
    atms: &[AtmLocation],
) -> Option<IdentityMatch> {
    for atm in atms {
        for rule in RULES {
            if rule.matches(config, candidate, atm) {
                return Some(IdentityMatch {
                    operator: atm.operator.clone(),
                    rule,
                });
            }
        }
    }
    None
}

/// Lowercased whitespace tokens of `name` minus the stopword set.
fn significant_words(name: &str, stopwords: &HashSet<String>) -> HashSet<String> {
    name.to_lowercase()
        .split_whitespace()
        .filter(|w| !stopwords.contains(*w))
        .map(str::to_string)
        .collect()
}

/// The trimmed, lowercased portion of `address` before the first comma.
fn street_segment(address: &str) -> String {
    address
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}
