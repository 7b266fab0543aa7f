//! Resolver configuration.
//!
//! Every value has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! duplicate_policy = "last_wins"
//! max_alternatives = 3
//! min_alternative_confidence = 0.3
//!
//! [thresholds]
//! confirmed = 0.8
//! suggested = 0.5
//! ```

use fieldmap_model::Tier;
use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

/// Score boundaries between confidence tiers.
///
/// - At or above `confirmed`: [`Tier::Confirmed`]
/// - At or above `suggested`: [`Tier::Suggested`]
/// - Below `suggested`: [`Tier::Unmappable`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceThresholds {
    /// Minimum score for a confirmed match (default: 0.8).
    pub confirmed: f64,
    /// Minimum score for a suggestion (default: 0.5).
    pub suggested: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            confirmed: 0.8,
            suggested: 0.5,
        }
    }
}

impl ConfidenceThresholds {
    /// Tighter boundaries: fewer automatic confirmations.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            confirmed: 0.9,
            suggested: 0.6,
        }
    }

    /// Looser boundaries for exploratory uploads.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            confirmed: 0.7,
            suggested: 0.4,
        }
    }

    /// Tier for a score. Pure function of the score and the thresholds.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> Tier {
        if confidence >= self.confirmed {
            Tier::Confirmed
        } else if confidence >= self.suggested {
            Tier::Suggested
        } else {
            Tier::Unmappable
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.suggested) || !(0.0..=1.0).contains(&self.confirmed) {
            return Err(MappingError::invalid_config(
                "thresholds must lie within [0, 1]",
            ));
        }
        if self.suggested > self.confirmed {
            return Err(MappingError::invalid_config(format!(
                "suggested threshold {} exceeds confirmed threshold {}",
                self.suggested, self.confirmed
            )));
        }
        Ok(())
    }
}

/// Which header keeps a field when several confirm it.
///
/// The loser is demoted to [`Tier::Suggested`], never dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later header in input order keeps the field.
    #[default]
    LastWins,
    /// The earlier header in input order keeps the field.
    FirstWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub thresholds: ConfidenceThresholds,
    /// Maximum alternatives attached to a resolution (default: 3).
    pub max_alternatives: usize,
    /// Alternatives must score strictly above this (default: 0.3).
    pub min_alternative_confidence: f64,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            max_alternatives: 3,
            min_alternative_confidence: 0.3,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl ResolverConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidConfig`] for malformed TOML, unknown
    /// keys, or out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| MappingError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if !(0.0..=1.0).contains(&self.min_alternative_confidence) {
            return Err(MappingError::invalid_config(
                "min_alternative_confidence must lie within [0, 1]",
            ));
        }
        Ok(())
    }
}
