//! Closed enumerations shared by the mapping engine and its callers.
//!
//! Each enum serializes to a stable lowercase code so that a UI layer can
//! round-trip the values without knowing the Rust representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence tier of a header-to-field match.
///
/// - **Confirmed**: the header is resolved and feeds the mapped field.
/// - **Suggested**: a plausible match that a user should review.
/// - **Unmappable**: no field is close enough; alternatives are hints only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Resolved: score at or above the confirmation threshold.
    Confirmed,
    /// Needs review: score between the suggestion and confirmation thresholds.
    Suggested,
    /// Not resolved: score below the suggestion threshold.
    Unmappable,
}

impl Tier {
    /// Returns the stable code used in serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Confirmed => "confirmed",
            Tier::Suggested => "suggested",
            Tier::Unmappable => "unmappable",
        }
    }

    /// Returns true if a user should look at this resolution before proceeding.
    pub fn needs_review(&self) -> bool {
        matches!(self, Tier::Suggested | Tier::Unmappable)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(Tier::Confirmed),
            "suggested" => Ok(Tier::Suggested),
            "unmappable" => Ok(Tier::Unmappable),
            _ => Err(format!("Unknown confidence tier: {s}")),
        }
    }
}

/// How a resolution reached its current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingSource {
    /// Produced by the resolver without user input.
    #[default]
    #[serde(rename = "auto")]
    Automatic,
    /// Promoted by a user override.
    #[serde(rename = "user_confirmed")]
    UserConfirmed,
    /// Excluded from the final mapping by a user override.
    #[serde(rename = "ignored")]
    Ignored,
}

impl MappingSource {
    /// Returns the stable code used in serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingSource::Automatic => "auto",
            MappingSource::UserConfirmed => "user_confirmed",
            MappingSource::Ignored => "ignored",
        }
    }

    /// Returns true if a user touched this resolution.
    pub fn is_user_decision(&self) -> bool {
        !matches!(self, MappingSource::Automatic)
    }
}

impl fmt::Display for MappingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy applied to a required field that has no confirmed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Substitute a bracketed placeholder value.
    DefaultValue,
    /// The field can be left out of downstream records.
    Optional,
    /// The downstream stage cannot run without this field.
    Error,
}

impl FallbackStrategy {
    /// Returns the stable code used in serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackStrategy::DefaultValue => "default_value",
            FallbackStrategy::Optional => "optional",
            FallbackStrategy::Error => "error",
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FallbackStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default_value" | "default" => Ok(FallbackStrategy::DefaultValue),
            "optional" => Ok(FallbackStrategy::Optional),
            "error" => Ok(FallbackStrategy::Error),
            _ => Err(format!("Unknown fallback strategy: {s}")),
        }
    }
}
