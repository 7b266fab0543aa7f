use serde::{Deserialize, Serialize};

use crate::enums::FallbackStrategy;

/// What to do about one required field that has no confirmed mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackDecision {
    pub field_name: String,
    pub strategy: FallbackStrategy,
    /// Placeholder text for [`FallbackStrategy::DefaultValue`].
    pub value: Option<String>,
    pub reason: String,
}

impl FallbackDecision {
    /// True if the downstream stage must not run with this decision present.
    pub fn is_blocking(&self) -> bool {
        self.strategy == FallbackStrategy::Error
    }
}
