use thiserror::Error;

/// Errors raised while building a canonical field registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("canonical field name must not be empty")]
    EmptyFieldName,

    #[error("invalid canonical field name '{name}': use lowercase letters, digits and '_'")]
    InvalidFieldName { name: String },

    #[error("'{name}' is reserved and cannot name a canonical field")]
    ReservedFieldName { name: String },

    #[error("duplicate canonical field: {name}")]
    DuplicateField { name: String },

    #[error("canonical field '{name}' has no spelling variants")]
    NoVariants { name: String },

    #[error("failed to parse field registry: {message}")]
    Parse { message: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
