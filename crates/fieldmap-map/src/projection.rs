//! Row projection from original headers to canonical fields.
//!
//! The file-parsing collaborator hands over rows keyed by original header.
//! A [`RowProjector`] turns each into a record keyed by canonical field,
//! filling placeholders from the fallback decisions.

use std::collections::BTreeMap;

use fieldmap_model::{FallbackDecision, FallbackStrategy, MappingReport};

use crate::error::{MappingError, Result};
use crate::fallback::{blocking_fields, placeholder_for};

/// Record keyed by canonical field name.
pub type CanonicalRecord = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct RowProjector {
    /// (canonical field, original header) in field order.
    columns: Vec<(String, String)>,
    /// (canonical field, placeholder) for unmapped personalization fields.
    defaults: Vec<(String, String)>,
}

impl RowProjector {
    /// Builds a projector from a final report and its fallback decisions.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::PipelineBlocked`] when any decision is ERROR.
    pub fn new(report: &MappingReport, decisions: &[FallbackDecision]) -> Result<Self> {
        let blocked = blocking_fields(decisions);
        if !blocked.is_empty() {
            return Err(MappingError::PipelineBlocked {
                fields: blocked.into_iter().map(str::to_string).collect(),
            });
        }
        let columns = report.final_mapping().into_iter().collect();
        let defaults = decisions
            .iter()
            .filter(|d| d.strategy == FallbackStrategy::DefaultValue)
            .filter_map(|d| Some((d.field_name.clone(), d.value.clone()?)))
            .collect();
        Ok(Self { columns, defaults })
    }

    /// Projects one row.
    ///
    /// Cells are trimmed. A blank or missing cell falls back to the field's
    /// placeholder when it has one and is omitted otherwise.
    pub fn project(&self, row: &BTreeMap<String, String>) -> CanonicalRecord {
        let mut record = CanonicalRecord::new();
        for (field, header) in &self.columns {
            let cell = row
                .get(header)
                .map(String::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty());
            match cell {
                Some(value) => {
                    record.insert(field.clone(), value.to_string());
                }
                None => {
                    if let Some(placeholder) = placeholder_for(field) {
                        record.insert(field.clone(), placeholder.to_string());
                    }
                }
            }
        }
        for (field, placeholder) in &self.defaults {
            record
                .entry(field.clone())
                .or_insert_with(|| placeholder.clone());
        }
        record
    }

    /// Projects every row, preserving order.
    pub fn project_all(&self, rows: &[BTreeMap<String, String>]) -> Vec<CanonicalRecord> {
        rows.iter().map(|row| self.project(row)).collect()
    }

    /// Canonical fields every projected record may carry.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns
            .iter()
            .chain(self.defaults.iter())
            .map(|(field, _)| field.as_str())
    }
}
