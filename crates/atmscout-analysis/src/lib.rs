//! Opportunity analysis for ATM placement.
//!
//! Cross-references scraped candidate businesses against existing-ATM
//! records: resolves whether a candidate already hosts a machine (fuzzy
//! identity matching over name, address, and proximity), measures the
//! distance to the nearest competitor, and produces a bounded 0–100
//! opportunity score per candidate. The whole pass is a pure, synchronous
//! function of the two input collections.

pub mod error;
pub mod export;
pub mod geo;
pub mod nearest;
pub mod pipeline;
pub mod resolver;
pub mod scorer;

pub use error::AnalysisError;
pub use export::{to_csv_string, write_csv, EXPORT_COLUMNS};
pub use geo::distance_km;
pub use nearest::find_nearest;
pub use pipeline::{analyze, AnalysisConfig, AnalysisReport, AnalysisSummary, Analyzer};
pub use resolver::{resolve_identity, IdentityMatch, MatchRule, ResolverConfig};
pub use scorer::{score, ScorerConfig};
