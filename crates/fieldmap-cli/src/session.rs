//! One mapping session: resolve, apply overrides, decide fallbacks.
//!
//! Mirrors what the upload UI does in a single pass so the command line can
//! show the same report a user would see.

use std::collections::BTreeMap;

use fieldmap_map::{
    MappingResolver, OverrideReconciler, ResolverConfig, blocking_fields, decide_fallbacks,
};
use fieldmap_model::{CanonicalFieldRegistry, FallbackDecision, MappingReport};
use serde::Serialize;
use tracing::info_span;

/// Final report of a session plus the fallback decisions derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOutcome {
    pub report: MappingReport,
    pub fallbacks: Vec<FallbackDecision>,
    /// Canonical field -> original header.
    pub mapping: BTreeMap<String, String>,
}

impl SessionOutcome {
    /// Required fields with an ERROR fallback.
    pub fn blocking_fields(&self) -> Vec<&str> {
        blocking_fields(&self.fallbacks)
    }

    pub fn is_blocked(&self) -> bool {
        self.fallbacks.iter().any(FallbackDecision::is_blocking)
    }
}

/// Runs a full session over `headers`.
///
/// # Errors
///
/// Returns the resolver error for an invalid configuration and the
/// reconciler error for an invalid override set.
pub fn run_session(
    registry: &CanonicalFieldRegistry,
    config: ResolverConfig,
    headers: &[String],
    overrides: &BTreeMap<String, String>,
) -> fieldmap_map::Result<SessionOutcome> {
    let span = info_span!("session", headers = headers.len(), overrides = overrides.len());
    let _guard = span.enter();

    let resolver = MappingResolver::with_config(registry, config)?;
    let report = resolver.resolve(headers);
    let report = if overrides.is_empty() {
        report
    } else {
        OverrideReconciler::new(registry).apply(report, overrides)?
    };
    let fallbacks = decide_fallbacks(&report, &registry.required_fields());
    let mapping = report.final_mapping();
    Ok(SessionOutcome {
        report,
        fallbacks,
        mapping,
    })
}

/// Parses a `HEADER=FIELD` command-line override.
///
/// The split happens at the last `=`, so headers may contain `=` themselves.
///
/// # Errors
///
/// Returns a message when there is no `=` or either side is blank.
pub fn parse_override(raw: &str) -> Result<(String, String), String> {
    let Some((header, field)) = raw.rsplit_once('=') else {
        return Err(format!("expected HEADER=FIELD, got '{raw}'"));
    };
    let field = field.trim();
    if header.trim().is_empty() || field.is_empty() {
        return Err(format!("expected HEADER=FIELD, got '{raw}'"));
    }
    Ok((header.to_string(), field.to_string()))
}
