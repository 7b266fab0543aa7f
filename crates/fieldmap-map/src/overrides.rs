//! User corrections on top of an automatic resolution.
//!
//! The UI shows a [`MappingReport`] as a form and sends back one choice per
//! header it wants to change: a canonical field name, or `"ignore"`.
//! Applying the same choices again yields the same report.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use fieldmap_model::{
    CanonicalFieldRegistry, HeaderResolution, IGNORE_KEYWORD, MappingReport, MappingSource,
    ResolutionReason, Tier,
};
use tracing::{info, warn};

use crate::error::{MappingError, Result};

/// A user's choice for one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideChoice {
    /// Keep the header out of the final mapping.
    Ignore,
    /// Map the header to this canonical field.
    Field(String),
}

impl OverrideChoice {
    /// Reads a raw form value. `"ignore"` matches case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.eq_ignore_ascii_case(IGNORE_KEYWORD) {
            Self::Ignore
        } else {
            Self::Field(value.to_string())
        }
    }
}

/// Merges user overrides into a report.
#[derive(Debug, Clone, Copy)]
pub struct OverrideReconciler<'a> {
    registry: &'a CanonicalFieldRegistry,
}

impl<'a> OverrideReconciler<'a> {
    pub fn new(registry: &'a CanonicalFieldRegistry) -> Self {
        Self { registry }
    }

    /// Applies `overrides` (original header -> field name or `"ignore"`).
    ///
    /// Overridden headers become Confirmed with confidence 1.0 and are marked
    /// user-confirmed; ignored headers keep their tier but leave the final
    /// mapping. Any other confirmed header holding a field that a user just
    /// assigned elsewhere is demoted to Suggested.
    ///
    /// A header demoted as a duplicate whose winner ends up ignored is
    /// re-pointed at the field's remaining holder, or confirmed again when
    /// nothing else holds the field.
    ///
    /// Every override is validated before anything changes.
    ///
    /// # Errors
    ///
    /// - [`MappingError::UnknownField`] if a value is not a canonical field
    /// - [`MappingError::UnknownHeader`] if a key is not a header in the report
    /// - [`MappingError::DuplicateOverrideTarget`] if two headers claim one field
    pub fn apply(
        &self,
        report: MappingReport,
        overrides: &BTreeMap<String, String>,
    ) -> Result<MappingReport> {
        let plan = self.validate(&report, overrides)?;
        let claimed: BTreeMap<&str, &str> = plan
            .iter()
            .filter_map(|(header, choice)| match choice {
                OverrideChoice::Field(field) => Some((field.as_str(), *header)),
                OverrideChoice::Ignore => None,
            })
            .collect();

        let mut resolutions = report.into_resolutions();
        for resolution in &mut resolutions {
            if let Some(choice) = plan.get(resolution.original_header.as_str()) {
                match choice {
                    OverrideChoice::Ignore => {
                        resolution.mapping_type = MappingSource::Ignored;
                    }
                    OverrideChoice::Field(field) => {
                        resolution.tier = Tier::Confirmed;
                        resolution.confidence = 1.0;
                        resolution.matched_field = Some(field.clone());
                        resolution.mapping_type = MappingSource::UserConfirmed;
                        resolution.reason = None;
                    }
                }
                continue;
            }

            if resolution.tier != Tier::Confirmed {
                continue;
            }
            let Some(field) = resolution.matched_field.clone() else {
                continue;
            };
            if let Some(winner) = claimed.get(field.as_str()) {
                resolution.tier = Tier::Suggested;
                resolution.mapping_type = MappingSource::Automatic;
                resolution.reason = Some(ResolutionReason::DuplicateTarget {
                    field,
                    winner: (*winner).to_string(),
                });
            }
        }

        reassign_orphaned_duplicates(&mut resolutions);

        let report = MappingReport::from_resolutions(resolutions);
        let summary = report.summary();
        info!(
            overrides = overrides.len(),
            confirmed = summary.confirmed,
            user_confirmed = summary.user_confirmed,
            ignored = summary.ignored,
            "applied mapping overrides"
        );
        Ok(report)
    }

    fn validate<'o>(
        &self,
        report: &MappingReport,
        overrides: &'o BTreeMap<String, String>,
    ) -> Result<BTreeMap<&'o str, OverrideChoice>> {
        let mut plan = BTreeMap::new();
        let mut claimed: BTreeMap<String, &'o str> = BTreeMap::new();
        for (header, raw) in overrides {
            if !report.contains_header(header) {
                warn!(header = header.as_str(), "override for unknown header");
                return Err(MappingError::UnknownHeader(header.clone()));
            }
            let choice = OverrideChoice::parse(raw);
            if let OverrideChoice::Field(field) = &choice {
                if !self.registry.contains(field) {
                    warn!(
                        header = header.as_str(),
                        field = field.as_str(),
                        "override names an unknown canonical field"
                    );
                    return Err(MappingError::UnknownField {
                        header: header.clone(),
                        field: field.clone(),
                    });
                }
                if let Some(first) = claimed.insert(field.clone(), header.as_str()) {
                    return Err(MappingError::DuplicateOverrideTarget {
                        field: field.clone(),
                        first: first.to_string(),
                        second: header.clone(),
                    });
                }
            }
            plan.insert(header.as_str(), choice);
        }
        Ok(plan)
    }
}

/// Repairs duplicate-target demotions whose winning header is now ignored.
///
/// Among orphaned candidates for one field the highest confidence is
/// confirmed again, the later header winning ties.
fn reassign_orphaned_duplicates(resolutions: &mut [HeaderResolution]) {
    let ignored: BTreeSet<&str> = resolutions
        .iter()
        .filter(|r| r.mapping_type == MappingSource::Ignored)
        .map(|r| r.original_header.as_str())
        .collect();
    if ignored.is_empty() {
        return;
    }

    let mut orphans: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, resolution) in resolutions.iter().enumerate() {
        if resolution.mapping_type != MappingSource::Automatic {
            continue;
        }
        if let Some(ResolutionReason::DuplicateTarget { field, winner }) = &resolution.reason
            && ignored.contains(winner.as_str())
        {
            orphans.entry(field.clone()).or_default().push(idx);
        }
    }
    if orphans.is_empty() {
        return;
    }

    let holders: BTreeMap<String, String> = resolutions
        .iter()
        .filter(|r| r.is_mapped())
        .filter_map(|r| Some((r.matched_field.clone()?, r.original_header.clone())))
        .collect();

    for (field, candidates) in orphans {
        let winner = match holders.get(&field) {
            Some(holder) => holder.clone(),
            None => {
                let Some(promoted) = candidates.iter().copied().max_by(|&a, &b| {
                    resolutions[a]
                        .confidence
                        .partial_cmp(&resolutions[b].confidence)
                        .unwrap_or(Ordering::Equal)
                }) else {
                    continue;
                };
                let resolution = &mut resolutions[promoted];
                resolution.tier = Tier::Confirmed;
                resolution.reason = None;
                info!(
                    field = field.as_str(),
                    header = resolution.original_header.as_str(),
                    "confirmed duplicate again after its winner was ignored"
                );
                resolution.original_header.clone()
            }
        };
        for idx in candidates {
            if let Some(ResolutionReason::DuplicateTarget { winner: previous, .. }) =
                &mut resolutions[idx].reason
            {
                previous.clone_from(&winner);
            }
        }
    }
}

/// Convenience wrapper around [`OverrideReconciler::apply`].
///
/// # Errors
///
/// See [`OverrideReconciler::apply`].
pub fn apply_overrides(
    registry: &CanonicalFieldRegistry,
    report: MappingReport,
    overrides: &BTreeMap<String, String>,
) -> Result<MappingReport> {
    OverrideReconciler::new(registry).apply(report, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_choice() {
        assert_eq!(OverrideChoice::parse("ignore"), OverrideChoice::Ignore);
        assert_eq!(OverrideChoice::parse("  IGNORE "), OverrideChoice::Ignore);
        assert_eq!(
            OverrideChoice::parse(" email "),
            OverrideChoice::Field("email".to_string())
        );
    }
}
