//! Fallback policy for required fields without a confirmed mapping.
//!
//! The policy is a fixed lookup on field identity:
//!
//! | field                       | strategy      | value            |
//! |-----------------------------|---------------|------------------|
//! | `first_name`                | default value | `[First Name]`   |
//! | `company_name`              | default value | `[Company]`      |
//! | `email`                     | error         |                  |
//! | anything else               | optional      |                  |

use std::collections::BTreeSet;

use fieldmap_model::{CanonicalField, FallbackDecision, FallbackStrategy, MappingReport};
use tracing::debug;

/// Personalization fields and the placeholder substituted for them.
const PLACEHOLDERS: &[(&str, &str)] = &[
    ("first_name", "[First Name]"),
    ("company_name", "[Company]"),
];

/// Fields without which nothing can be delivered.
const DELIVERY_CRITICAL: &[&str] = &["email"];

const REASON_PLACEHOLDER: &str = "required for personalization, using placeholder";
const REASON_DELIVERY: &str = "required for delivery, cannot proceed without";
const REASON_OPTIONAL: &str = "non-essential field, can be omitted";

/// Placeholder text for a personalization field.
pub fn placeholder_for(field: &str) -> Option<&'static str> {
    PLACEHOLDERS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, placeholder)| *placeholder)
}

/// Strategy the policy assigns to a field.
pub fn strategy_for(field: &str) -> FallbackStrategy {
    if placeholder_for(field).is_some() {
        FallbackStrategy::DefaultValue
    } else if DELIVERY_CRITICAL.contains(&field) {
        FallbackStrategy::Error
    } else {
        FallbackStrategy::Optional
    }
}

/// Decision for one field, regardless of whether it is mapped.
pub fn decide_for_field(field: &str) -> FallbackDecision {
    let strategy = strategy_for(field);
    let (value, reason) = match strategy {
        FallbackStrategy::DefaultValue => (placeholder_for(field), REASON_PLACEHOLDER),
        FallbackStrategy::Error => (None, REASON_DELIVERY),
        FallbackStrategy::Optional => (None, REASON_OPTIONAL),
    };
    FallbackDecision {
        field_name: field.to_string(),
        strategy,
        value: value.map(str::to_string),
        reason: reason.to_string(),
    }
}

/// One decision per required field absent from the final mapping.
///
/// Decisions follow the order of `required`; repeated fields are decided
/// once. Pure: the same inputs always give the same output.
pub fn decide_fallbacks(
    report: &MappingReport,
    required: &[&CanonicalField],
) -> Vec<FallbackDecision> {
    let mapped = report.mapped_fields();
    let mut seen = BTreeSet::new();
    let decisions: Vec<FallbackDecision> = required
        .iter()
        .filter(|field| seen.insert(field.name.as_str()))
        .filter(|field| !mapped.contains(&field.name))
        .map(|field| decide_for_field(&field.name))
        .collect();
    debug!(
        required = required.len(),
        missing = decisions.len(),
        blocking = decisions.iter().filter(|d| d.is_blocking()).count(),
        "decided fallbacks"
    );
    decisions
}

/// Names of fields whose decision blocks the downstream stage.
pub fn blocking_fields(decisions: &[FallbackDecision]) -> Vec<&str> {
    decisions
        .iter()
        .filter(|d| d.is_blocking())
        .map(|d| d.field_name.as_str())
        .collect()
}
