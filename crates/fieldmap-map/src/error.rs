//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping operations.
///
/// Per-header problems (ambiguous, unmappable, empty) never surface here;
/// they are recorded in the report. Only malformed caller input does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    /// Override names a field that is not in the registry.
    #[error("Unknown canonical field '{field}' in override for header '{header}'")]
    UnknownField {
        /// Header the override was given for.
        header: String,
        /// The rejected field name.
        field: String,
    },

    /// Override names a header that is not in the report.
    #[error("Header not found in report: {0}")]
    UnknownHeader(String),

    /// Two overrides claim the same canonical field.
    #[error("Canonical field '{field}' is overridden by both '{first}' and '{second}'")]
    DuplicateOverrideTarget {
        /// The contested field.
        field: String,
        /// First header claiming it.
        first: String,
        /// Second header claiming it.
        second: String,
    },

    /// At least one required field has an ERROR fallback.
    #[error("Required fields cannot be resolved: {}", fields.join(", "))]
    PipelineBlocked {
        /// Fields whose fallback is ERROR.
        fields: Vec<String>,
    },

    /// A registry variant leaves nothing to match on after normalization.
    #[error("Variant '{variant}' of field '{field}' is empty after normalization")]
    UnmatchableVariant {
        /// Field the variant belongs to.
        field: String,
        /// The raw variant.
        variant: String,
    },

    /// Two fields share a variant once both are normalized.
    #[error("Fields '{first}' and '{second}' share the normalized variant '{token}'")]
    AmbiguousVariant {
        /// The shared normalized token.
        token: String,
        /// Field listed first in the registry.
        first: String,
        /// Field listed later.
        second: String,
    },

    /// Resolver configuration is out of range or unparsable.
    #[error("Invalid resolver configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },
}

impl MappingError {
    /// Get the header associated with this error, if any.
    pub fn header(&self) -> Option<&str> {
        match self {
            Self::UnknownField { header, .. } => Some(header),
            Self::UnknownHeader(header) => Some(header),
            Self::DuplicateOverrideTarget { second, .. } => Some(second),
            _ => None,
        }
    }

    /// Get the canonical field associated with this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownField { field, .. } => Some(field),
            Self::DuplicateOverrideTarget { field, .. } => Some(field),
            Self::UnmatchableVariant { field, .. } => Some(field),
            Self::AmbiguousVariant { second, .. } => Some(second),
            _ => None,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;
