//! Similarity scoring between normalized tokens and canonical fields.
//!
//! All confidence arithmetic goes through [`similarity`]; thresholds are
//! applied elsewhere so that tuning them never touches the scorer.

use std::cmp::Ordering;
use std::collections::HashMap;

use fieldmap_model::{Alternative, CanonicalFieldRegistry};
use rapidfuzz::distance::levenshtein;

use crate::error::{MappingError, Result};
use crate::normalize::normalize;

/// Edit-distance similarity in `[0, 1]`.
///
/// `1 - levenshtein(a, b) / max(len(a), len(b))`, measured in characters.
/// Two empty strings are identical (1.0); an empty string against a
/// non-empty one scores 0.0. Symmetric in its arguments.
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longest = len_a.max(len_b);
    if longest == 0 {
        return 1.0;
    }
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    (1.0 - distance as f64 / longest as f64).clamp(0.0, 1.0)
}

/// Score of one canonical field against a header.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldScore<'a> {
    /// Canonical field name.
    pub field: &'a str,
    /// Best similarity over the field's variants.
    pub confidence: f64,
    /// Normalized variant that produced the best similarity.
    pub variant: &'a str,
}

impl FieldScore<'_> {
    pub fn to_alternative(&self) -> Alternative {
        Alternative {
            field: self.field.to_string(),
            confidence: self.confidence,
        }
    }
}

#[derive(Debug, Clone)]
struct FieldVariants {
    name: String,
    variants: Vec<String>,
}

/// Scores normalized headers against every field of a registry.
///
/// Variants are normalized once at construction, and spellings repeated
/// within a field are kept once. Every variant must still match its own
/// field exactly, so a variant that normalizes to nothing, or to a token
/// another field already uses, is rejected.
#[derive(Debug, Clone)]
pub struct FieldScorer {
    fields: Vec<FieldVariants>,
}

impl FieldScorer {
    /// Normalizes and checks every variant of `registry`.
    ///
    /// # Errors
    ///
    /// - [`MappingError::UnmatchableVariant`] if a variant normalizes to `""`
    /// - [`MappingError::AmbiguousVariant`] if two fields share a normalized variant
    pub fn new(registry: &CanonicalFieldRegistry) -> Result<Self> {
        let mut owners: HashMap<String, &str> = HashMap::new();
        let mut fields = Vec::with_capacity(registry.len());
        for field in registry.fields() {
            let mut variants: Vec<String> = Vec::with_capacity(field.variants.len());
            for variant in &field.variants {
                let token = normalize(variant);
                if token.is_empty() {
                    return Err(MappingError::UnmatchableVariant {
                        field: field.name.clone(),
                        variant: variant.clone(),
                    });
                }
                match owners.get(token.as_str()) {
                    Some(owner) if *owner != field.name => {
                        return Err(MappingError::AmbiguousVariant {
                            token,
                            first: (*owner).to_string(),
                            second: field.name.clone(),
                        });
                    }
                    Some(_) => continue,
                    None => {}
                }
                owners.insert(token.clone(), &field.name);
                variants.push(token);
            }
            fields.push(FieldVariants {
                name: field.name.clone(),
                variants,
            });
        }
        Ok(Self { fields })
    }

    /// Scores every field, best first.
    ///
    /// Ties keep registry order.
    pub fn score_all(&self, normalized: &str) -> Vec<FieldScore<'_>> {
        let mut scores: Vec<FieldScore<'_>> = self
            .fields
            .iter()
            .map(|field| best_variant(field, normalized))
            .collect();
        scores.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        scores
    }

    /// Best-scoring field, if the registry has any field.
    pub fn best(&self, normalized: &str) -> Option<FieldScore<'_>> {
        let mut best: Option<FieldScore<'_>> = None;
        for field in &self.fields {
            let candidate = best_variant(field, normalized);
            if best
                .as_ref()
                .is_none_or(|current| candidate.confidence > current.confidence)
            {
                best = Some(candidate);
            }
        }
        best
    }

    /// Normalized variants of a field, if the field is known.
    pub fn variants(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.variants.as_slice())
    }
}

fn best_variant<'a>(field: &'a FieldVariants, normalized: &str) -> FieldScore<'a> {
    let mut best = FieldScore {
        field: &field.name,
        confidence: 0.0,
        variant: "",
    };
    for variant in &field.variants {
        let score = similarity(normalized, variant);
        if best.variant.is_empty() || score > best.confidence {
            best.confidence = score;
            best.variant = variant;
        }
        if score >= 1.0 {
            break;
        }
    }
    best
}
