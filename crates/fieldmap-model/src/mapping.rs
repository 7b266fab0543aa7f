//! Resolution report types.
//!
//! A [`MappingReport`] holds exactly one [`HeaderResolution`] per input
//! header, in input order, plus summary counts derived from them. The
//! counts are recomputed whenever a report is built so they always agree
//! with the resolutions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{MappingSource, Tier};

/// A candidate field and how closely the header matched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub field: String,
    pub confidence: f64,
}

/// Why a resolution ended up where it did, when that is not obvious from
/// the score alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ResolutionReason {
    /// Nothing Latin-comparable was left after normalization.
    EmptyAfterNormalization,
    /// The best score did not reach the suggestion threshold.
    BelowSuggestionThreshold,
    /// Another header holds the confirmed mapping for the same field.
    DuplicateTarget { field: String, winner: String },
}

impl ResolutionReason {
    /// Stable code for the reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyAfterNormalization => "empty_after_normalization",
            Self::BelowSuggestionThreshold => "below_suggestion_threshold",
            Self::DuplicateTarget { .. } => "duplicate_target",
        }
    }
}

impl fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTarget { field, winner } => {
                write!(f, "duplicate_target: '{field}' is held by '{winner}'")
            }
            other => write!(f, "{}", other.code()),
        }
    }
}

/// Outcome of resolving one spreadsheet header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderResolution {
    /// Header exactly as it appeared in the upload.
    pub original_header: String,
    /// Normalized token the header was compared as.
    pub normalized: String,
    /// Best field for Confirmed/Suggested; always `None` for Unmappable.
    pub matched_field: Option<String>,
    /// Similarity of the best match (0.0 to 1.0).
    pub confidence: f64,
    pub tier: Tier,
    /// Best-scoring fields, highest first.
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub reason: Option<ResolutionReason>,
    #[serde(default)]
    pub mapping_type: MappingSource,
}

impl HeaderResolution {
    /// Resolution for a header with no comparable characters.
    pub fn empty(original_header: impl Into<String>) -> Self {
        Self {
            original_header: original_header.into(),
            normalized: String::new(),
            matched_field: None,
            confidence: 0.0,
            tier: Tier::Unmappable,
            alternatives: Vec::new(),
            reason: Some(ResolutionReason::EmptyAfterNormalization),
            mapping_type: MappingSource::Automatic,
        }
    }

    /// True when this header feeds a field in the final mapping.
    pub fn is_mapped(&self) -> bool {
        self.tier == Tier::Confirmed
            && self.mapping_type != MappingSource::Ignored
            && self.matched_field.is_some()
    }

    /// Top alternative, if any.
    pub fn best_alternative(&self) -> Option<&Alternative> {
        self.alternatives.first()
    }
}

/// Counts derived from a report's resolutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total: usize,
    pub confirmed: usize,
    pub suggested: usize,
    pub unmappable: usize,
    pub user_confirmed: usize,
    pub ignored: usize,
}

impl MappingSummary {
    fn from_resolutions(resolutions: &[HeaderResolution]) -> Self {
        let mut summary = Self {
            total: resolutions.len(),
            ..Self::default()
        };
        for resolution in resolutions {
            match resolution.tier {
                Tier::Confirmed => summary.confirmed += 1,
                Tier::Suggested => summary.suggested += 1,
                Tier::Unmappable => summary.unmappable += 1,
            }
            match resolution.mapping_type {
                MappingSource::UserConfirmed => summary.user_confirmed += 1,
                MappingSource::Ignored => summary.ignored += 1,
                MappingSource::Automatic => {}
            }
        }
        summary
    }

    /// Headers a user should review (suggested or unmappable).
    pub fn needs_review(&self) -> usize {
        self.suggested + self.unmappable
    }
}

impl fmt::Display for MappingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} headers: {} confirmed, {} suggested, {} unmappable",
            self.total, self.confirmed, self.suggested, self.unmappable
        )?;
        if self.user_confirmed > 0 || self.ignored > 0 {
            write!(
                f,
                " ({} user-confirmed, {} ignored)",
                self.user_confirmed, self.ignored
            )?;
        }
        Ok(())
    }
}

/// All resolutions for one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReportWire")]
pub struct MappingReport {
    resolutions: Vec<HeaderResolution>,
    summary: MappingSummary,
}

#[derive(Deserialize)]
struct ReportWire {
    resolutions: Vec<HeaderResolution>,
}

impl From<ReportWire> for MappingReport {
    fn from(wire: ReportWire) -> Self {
        Self::from_resolutions(wire.resolutions)
    }
}

impl MappingReport {
    pub fn from_resolutions(resolutions: Vec<HeaderResolution>) -> Self {
        let summary = MappingSummary::from_resolutions(&resolutions);
        Self {
            resolutions,
            summary,
        }
    }

    pub fn resolutions(&self) -> &[HeaderResolution] {
        &self.resolutions
    }

    pub fn into_resolutions(self) -> Vec<HeaderResolution> {
        self.resolutions
    }

    pub fn summary(&self) -> MappingSummary {
        self.summary
    }

    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }

    /// First resolution for an original header.
    pub fn get(&self, original_header: &str) -> Option<&HeaderResolution> {
        self.resolutions
            .iter()
            .find(|r| r.original_header == original_header)
    }

    /// Returns true if any resolution was produced for the header.
    pub fn contains_header(&self, original_header: &str) -> bool {
        self.get(original_header).is_some()
    }

    /// Resolutions in a given tier, in input order.
    pub fn by_tier(&self, tier: Tier) -> Vec<&HeaderResolution> {
        self.resolutions.iter().filter(|r| r.tier == tier).collect()
    }

    /// Canonical field -> original header for every mapped resolution.
    pub fn final_mapping(&self) -> BTreeMap<String, String> {
        let mut mapping = BTreeMap::new();
        for resolution in &self.resolutions {
            if !resolution.is_mapped() {
                continue;
            }
            if let Some(field) = &resolution.matched_field {
                mapping.insert(field.clone(), resolution.original_header.clone());
            }
        }
        mapping
    }

    /// Canonical fields present in the final mapping.
    pub fn mapped_fields(&self) -> BTreeSet<String> {
        self.final_mapping().into_keys().collect()
    }

    /// Returns true when no header needs a review step.
    pub fn is_fully_confirmed(&self) -> bool {
        self.summary.needs_review() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmed(header: &str, field: &str) -> HeaderResolution {
        HeaderResolution {
            original_header: header.to_string(),
            normalized: header.to_lowercase(),
            matched_field: Some(field.to_string()),
            confidence: 1.0,
            tier: Tier::Confirmed,
            alternatives: vec![Alternative {
                field: field.to_string(),
                confidence: 1.0,
            }],
            reason: None,
            mapping_type: MappingSource::Automatic,
        }
    }

    #[test]
    fn summary_counts_tiers() {
        let report = MappingReport::from_resolutions(vec![
            confirmed("First Name", "first_name"),
            HeaderResolution::empty("!!!"),
        ]);
        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.unmappable, 1);
        assert_eq!(summary.needs_review(), 1);
    }

    #[test]
    fn ignored_resolution_is_not_mapped() {
        let mut ignored = confirmed("Email", "email");
        ignored.mapping_type = MappingSource::Ignored;
        let report = MappingReport::from_resolutions(vec![
            confirmed("First Name", "first_name"),
            ignored,
        ]);
        let mapping = report.final_mapping();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("first_name").map(String::as_str), Some("First Name"));
        assert_eq!(report.summary().ignored, 1);
    }

    #[test]
    fn deserialize_recomputes_summary() {
        let report = MappingReport::from_resolutions(vec![confirmed("First Name", "first_name")]);
        let mut json: serde_json::Value = serde_json::to_value(&report).unwrap();
        json["summary"]["confirmed"] = serde_json::json!(42);
        let round: MappingReport = serde_json::from_value(json).unwrap();
        assert_eq!(round.summary().confirmed, 1);
        assert_eq!(round, report);
    }

    #[test]
    fn reason_serializes_with_code() {
        let reason = ResolutionReason::DuplicateTarget {
            field: "first_name".to_string(),
            winner: "Firstname".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["code"], "duplicate_target");
        assert_eq!(json["winner"], "Firstname");
        assert_eq!(
            ResolutionReason::EmptyAfterNormalization.to_string(),
            "empty_after_normalization"
        );
    }
}
