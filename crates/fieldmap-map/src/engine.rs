//! Mapping resolver implementation.

use std::collections::BTreeMap;

use fieldmap_model::{
    Alternative, CanonicalFieldRegistry, HeaderResolution, MappingReport, MappingSource,
    ResolutionReason, Tier,
};
use tracing::{debug, debug_span, trace, warn};

use crate::config::{DuplicatePolicy, ResolverConfig};
use crate::error::Result;
use crate::normalize::normalize;
use crate::score::{FieldScore, FieldScorer};

/// Resolves spreadsheet headers to canonical fields.
///
/// The resolver borrows an immutable registry and holds no mutable state,
/// so one instance can serve any number of threads. Each call to
/// [`resolve`](Self::resolve) returns a fresh [`MappingReport`].
///
/// # Example
///
/// ```
/// use fieldmap_map::MappingResolver;
/// use fieldmap_model::{Tier, default_registry};
///
/// let resolver = MappingResolver::new(default_registry())?;
/// let report = resolver.resolve(&["First Name", "Comp Name", "Mail"]);
/// assert_eq!(report.resolutions()[0].tier, Tier::Confirmed);
/// assert_eq!(report.resolutions()[1].tier, Tier::Suggested);
/// # Ok::<(), fieldmap_map::MappingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MappingResolver<'a> {
    registry: &'a CanonicalFieldRegistry,
    scorer: FieldScorer,
    config: ResolverConfig,
}

impl<'a> MappingResolver<'a> {
    /// Creates a resolver with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails when a registry variant would not resolve to its own field,
    /// see [`FieldScorer::new`].
    pub fn new(registry: &'a CanonicalFieldRegistry) -> Result<Self> {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// Creates a resolver with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappingError::InvalidConfig`] if the configuration
    /// does not validate, and the [`FieldScorer::new`] errors for a registry
    /// with unusable variants.
    pub fn with_config(
        registry: &'a CanonicalFieldRegistry,
        config: ResolverConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            scorer: FieldScorer::new(registry)?,
            config,
        })
    }

    pub fn registry(&self) -> &'a CanonicalFieldRegistry {
        self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves every header, preserving input order.
    ///
    /// One resolution is produced per header, including duplicates and
    /// headers that normalize to nothing.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> MappingReport {
        let span = debug_span!("resolve_headers", headers = headers.len());
        let _guard = span.enter();

        let mut resolutions: Vec<HeaderResolution> = headers
            .iter()
            .map(|header| self.resolve_header(header.as_ref()))
            .collect();
        self.settle_duplicate_targets(&mut resolutions);

        let report = MappingReport::from_resolutions(resolutions);
        let summary = report.summary();
        debug!(
            confirmed = summary.confirmed,
            suggested = summary.suggested,
            unmappable = summary.unmappable,
            "resolved headers"
        );
        report
    }

    /// Resolves a single header in isolation (no duplicate handling).
    pub fn resolve_header(&self, header: &str) -> HeaderResolution {
        let normalized = normalize(header);
        if normalized.is_empty() {
            trace!(header, "header is empty after normalization");
            return HeaderResolution::empty(header);
        }

        let scores = self.scorer.score_all(&normalized);
        let (best_field, confidence) = scores
            .first()
            .map(|best| (Some(best.field.to_string()), best.confidence))
            .unwrap_or((None, 0.0));
        let tier = self.config.thresholds.categorize(confidence);
        let alternatives = self.alternatives(&scores);

        trace!(
            header,
            normalized = normalized.as_str(),
            field = best_field.as_deref().unwrap_or("-"),
            confidence,
            tier = tier.as_str(),
            "scored header"
        );

        let (matched_field, reason) = match tier {
            Tier::Confirmed | Tier::Suggested => (best_field, None),
            Tier::Unmappable => (None, Some(ResolutionReason::BelowSuggestionThreshold)),
        };

        HeaderResolution {
            original_header: header.to_string(),
            normalized,
            matched_field,
            confidence,
            tier,
            alternatives,
            reason,
            mapping_type: MappingSource::Automatic,
        }
    }

    /// Ranked alternatives for a header, without tiering.
    ///
    /// Applies the same cut-off and limit as attached alternatives.
    pub fn score_header(&self, header: &str) -> Vec<Alternative> {
        let normalized = normalize(header);
        if normalized.is_empty() {
            return Vec::new();
        }
        self.alternatives(&self.scorer.score_all(&normalized))
    }

    fn alternatives(&self, scores: &[FieldScore<'_>]) -> Vec<Alternative> {
        scores
            .iter()
            .filter(|score| score.confidence > self.config.min_alternative_confidence)
            .take(self.config.max_alternatives)
            .map(FieldScore::to_alternative)
            .collect()
    }

    /// Keeps at most one confirmed header per field.
    ///
    /// The header chosen by the duplicate policy keeps the field; the other
    /// is demoted to Suggested and records which header won.
    fn settle_duplicate_targets(&self, resolutions: &mut [HeaderResolution]) {
        let mut holders: BTreeMap<String, usize> = BTreeMap::new();
        for idx in 0..resolutions.len() {
            if resolutions[idx].tier != Tier::Confirmed {
                continue;
            }
            let Some(field) = resolutions[idx].matched_field.clone() else {
                continue;
            };
            let Some(previous) = holders.get(&field).copied() else {
                holders.insert(field, idx);
                continue;
            };
            let (loser, winner) = match self.config.duplicate_policy {
                DuplicatePolicy::LastWins => (previous, idx),
                DuplicatePolicy::FirstWins => (idx, previous),
            };
            let winner_header = resolutions[winner].original_header.clone();
            warn!(
                field = field.as_str(),
                kept = winner_header.as_str(),
                demoted = resolutions[loser].original_header.as_str(),
                "several headers confirm the same field"
            );
            let demoted = &mut resolutions[loser];
            demoted.tier = Tier::Suggested;
            demoted.reason = Some(ResolutionReason::DuplicateTarget {
                field: field.clone(),
                winner: winner_header,
            });
            holders.insert(field, winner);
        }
    }
}
