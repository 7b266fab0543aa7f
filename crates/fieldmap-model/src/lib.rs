//! Data model for header-to-field mapping.
//!
//! Types here carry no behaviour beyond bookkeeping; the resolution engine
//! lives in `fieldmap-map`.

#![deny(unsafe_code)]

pub mod enums;
pub mod error;
pub mod fallback;
pub mod field;
pub mod mapping;
pub mod registry;

pub use enums::{FallbackStrategy, MappingSource, Tier};
pub use error::{ModelError, Result};
pub use fallback::FallbackDecision;
pub use field::CanonicalField;
pub use mapping::{Alternative, HeaderResolution, MappingReport, MappingSummary, ResolutionReason};
pub use registry::{CanonicalFieldRegistry, IGNORE_KEYWORD, default_registry};
