//! Header-to-field mapping engine.
//!
//! Resolves arbitrary spreadsheet headers (any case, punctuation, accents,
//! abbreviations or language) to canonical business fields, classifies each
//! match into a confidence tier, reconciles user corrections, and decides a
//! fallback for required fields that stay unresolved.
//!
//! # Flow
//!
//! ```text
//! headers -> normalize -> MappingResolver (FieldScorer + registry)
//!         -> MappingReport -> OverrideReconciler -> final report
//!         -> decide_fallbacks -> RowProjector
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use fieldmap_map::{MappingResolver, OverrideReconciler, decide_fallbacks};
//! use fieldmap_model::default_registry;
//!
//! let registry = default_registry();
//! let resolver = MappingResolver::new(registry)?;
//! let report = resolver.resolve(&["First Name", "Comp Name", "Mail"]);
//!
//! let mut overrides = BTreeMap::new();
//! overrides.insert("Mail".to_string(), "email".to_string());
//! overrides.insert("Comp Name".to_string(), "company_name".to_string());
//! let report = OverrideReconciler::new(registry).apply(report, &overrides)?;
//!
//! let decisions = decide_fallbacks(&report, &registry.required_fields());
//! assert!(decisions.is_empty());
//! # Ok::<(), fieldmap_map::MappingError>(())
//! ```

#![deny(unsafe_code)]

mod config;
mod engine;
mod error;
mod fallback;
mod normalize;
mod overrides;
mod projection;
mod score;

pub use config::{ConfidenceThresholds, DuplicatePolicy, ResolverConfig};
pub use engine::MappingResolver;
pub use error::{MappingError, Result};
pub use fallback::{
    blocking_fields, decide_fallbacks, decide_for_field, placeholder_for, strategy_for,
};
pub use normalize::{normalize, normalize_opt};
pub use overrides::{OverrideChoice, OverrideReconciler, apply_overrides};
pub use projection::{CanonicalRecord, RowProjector};
pub use score::{FieldScore, FieldScorer, similarity};
