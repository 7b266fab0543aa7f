use serde::{Deserialize, Serialize};

/// One business concept that downstream personalization expects, such as
/// `first_name`, together with the spellings it is known to appear under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalField {
    /// Snake-case identifier (e.g., "first_name").
    pub name: String,
    /// Human-readable title (e.g., "First Name").
    #[serde(default)]
    pub label: Option<String>,
    /// Known header spellings, in their raw (un-normalized) form.
    pub variants: Vec<String>,
    /// Whether downstream processing expects this field.
    #[serde(default)]
    pub required: bool,
}

impl CanonicalField {
    pub fn new(name: impl Into<String>, variants: Vec<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            label: None,
            variants,
            required,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label for display, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
