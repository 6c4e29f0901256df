//! Analysis orchestration: one synchronous pass over all candidates.

use atmscout_core::{AtmLocation, CandidateLocation, OpportunityRecord, OpportunityStatus};

use crate::error::AnalysisError;
use crate::nearest::find_nearest;
use crate::resolver::{resolve_identity, ResolverConfig};
use crate::scorer::{score, ScorerConfig};

/// How often to emit progress while iterating candidates.
const PROGRESS_INTERVAL: usize = 100;

/// Combined configuration for one analysis pass.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub resolver: ResolverConfig,
    pub scorer: ScorerConfig,
    /// Records at or above this score count as high-opportunity in the
    /// summary.
    pub high_score_threshold: u8,
}

impl AnalysisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            scorer: ScorerConfig::default(),
            high_score_threshold: 70,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate counts reported after a pass. Reporting-only: the record list
/// is the contract, these are a convenience for logs and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub total: usize,
    pub with_competitor: usize,
    pub without_competitor: usize,
    pub high_score: usize,
}

/// Result of one analysis pass: records sorted by score descending plus the
/// aggregate summary.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub records: Vec<OpportunityRecord>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Complete,
}

/// Single-use orchestrator. One pass per instance, no retry or resume; build
/// a fresh `Analyzer` to analyze again.
#[derive(Debug)]
pub struct Analyzer {
    config: AnalysisConfig,
    state: RunState,
}

impl Analyzer {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
        }
    }

    /// Run the full pass: identity resolution, nearest-competitor search,
    /// and scoring for every candidate in input order, then a stable sort by
    /// score descending (equal scores retain input order).
    ///
    /// Data-quality gaps (missing coordinates, rating, name, address) are
    /// absorbed with sentinels inside the components; nothing about a
    /// candidate's content can fail the pass.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::AlreadyRun`] if this analyzer has completed
    /// a pass before.
    pub fn run(
        &mut self,
        candidates: &[CandidateLocation],
        atms: &[AtmLocation],
    ) -> Result<AnalysisReport, AnalysisError> {
        if self.state == RunState::Complete {
            return Err(AnalysisError::AlreadyRun);
        }
        self.state = RunState::Running;

        tracing::info!(
            candidates = candidates.len(),
            atms = atms.len(),
            "analyzing locations for opportunities"
        );

        let mut records: Vec<OpportunityRecord> = Vec::with_capacity(candidates.len());

        for (i, candidate) in candidates.iter().enumerate() {
            records.push(self.evaluate(candidate, atms));

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                tracing::debug!(processed = i + 1, total = candidates.len(), "progress");
            }
        }

        // Stable sort keeps input order among equal scores.
        records.sort_by(|a, b| b.score.cmp(&a.score));

        let with_competitor = records.iter().filter(|r| r.has_competitor).count();
        let high_score = records
            .iter()
            .filter(|r| r.score >= self.config.high_score_threshold)
            .count();
        let summary = AnalysisSummary {
            total: records.len(),
            with_competitor,
            without_competitor: records.len() - with_competitor,
            high_score,
        };

        tracing::info!(
            total = summary.total,
            with_competitor = summary.with_competitor,
            without_competitor = summary.without_competitor,
            high_score = summary.high_score,
            "analysis complete"
        );

        self.state = RunState::Complete;
        Ok(AnalysisReport { records, summary })
    }

    fn evaluate(&self, candidate: &CandidateLocation, atms: &[AtmLocation]) -> OpportunityRecord {
        let identity = resolve_identity(&self.config.resolver, candidate, atms);
        let (nearest_distance, nearest_operator) = find_nearest(candidate.coords(), atms);

        let has_competitor = identity.is_some();
        let points = score(&self.config.scorer, candidate, has_competitor, nearest_distance);

        OpportunityRecord {
            business_name: candidate.business_name.clone(),
            address: candidate.address.clone(),
            phone: candidate.phone.clone(),
            business_type: candidate.business_type.clone(),
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            has_competitor,
            competitor_operator: identity.map(|m| m.operator).unwrap_or_default(),
            nearest_distance_km: nearest_distance.is_finite().then_some(nearest_distance),
            nearest_operator: nearest_operator.unwrap_or_default().to_string(),
            google_rating: candidate.google_rating,
            score: points,
            status: OpportunityStatus::NotContacted,
            notes: String::new(),
        }
    }
}

/// Convenience wrapper: build a single-use [`Analyzer`] and run one pass.
#[must_use]
pub fn analyze(
    config: AnalysisConfig,
    candidates: &[CandidateLocation],
    atms: &[AtmLocation],
) -> AnalysisReport {
    let mut analyzer = Analyzer::new(config);
    // A fresh analyzer is always Idle, so the single pass cannot fail.
    match analyzer.run(candidates, atms) {
        Ok(report) => report,
        Err(AnalysisError::AlreadyRun | AnalysisError::ExportIo { .. }) => {
            unreachable!("fresh analyzer cannot have run before")
        }
    }
}
