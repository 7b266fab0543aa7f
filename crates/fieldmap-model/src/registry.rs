//! Canonical field registry.
//!
//! The registry is an immutable, ordered table of [`CanonicalField`]s. It is
//! built once (either the built-in business table or a TOML document) and
//! then shared by reference; nothing mutates it after construction, so any
//! number of concurrent resolutions may read it without locking.
//!
//! Registry order matters: when two fields score equally for a header, the
//! one listed first wins.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{ModelError, Result};
use crate::field::CanonicalField;

/// Override keyword that can never be used as a field name.
pub const IGNORE_KEYWORD: &str = "ignore";

/// (name, label, required, variants)
type BuiltinField = (&'static str, &'static str, bool, &'static [&'static str]);

const BUILTIN_FIELDS: &[BuiltinField] = &[
    (
        "first_name",
        "First Name",
        true,
        &["First Name", "FirstName", "Given Name", "Forename", "First", "Prénom", "Vorname", "Nombre"],
    ),
    (
        "last_name",
        "Last Name",
        false,
        &["Last Name", "LastName", "Surname", "Family Name", "Last", "Nachname", "Apellido", "Nom de Famille"],
    ),
    (
        "full_name",
        "Full Name",
        false,
        &["Full Name", "Contact Name", "Person Name"],
    ),
    (
        "company_name",
        "Company",
        true,
        &[
            "Company Name",
            "Company",
            "Organization",
            "Organisation",
            "Employer",
            "Account Name",
            "Business Name",
            "Société",
            "Empresa",
            "Firma",
            "Unternehmen",
            "Entreprise",
        ],
    ),
    (
        "job_title",
        "Job Title",
        false,
        &["Job Title", "Title", "Position", "Designation", "Job Role", "Poste", "Cargo", "Berufsbezeichnung"],
    ),
    (
        "industry",
        "Industry",
        false,
        &["Industry", "Sector", "Vertical"],
    ),
    (
        "email",
        "Email",
        true,
        &[
            "Email Address",
            "E-mail",
            "E-mail Address",
            "Work Email",
            "Contact Email",
            "Email Id",
            "Courriel",
            "Correo Electrónico",
            "E-Mail-Adresse",
        ],
    ),
    (
        "phone",
        "Phone",
        false,
        &["Phone Number", "Phone", "Telephone", "Mobile", "Mobile Number", "Teléfono", "Telefon"],
    ),
    (
        "website",
        "Website",
        false,
        &["Website", "Company Website", "Web Site", "Homepage", "Url"],
    ),
    (
        "linkedin_url",
        "LinkedIn",
        false,
        &["LinkedIn", "LinkedIn Url", "LinkedIn Profile"],
    ),
    (
        "city",
        "City",
        false,
        &["City", "Town", "Ville", "Ciudad", "Stadt"],
    ),
    (
        "country",
        "Country",
        false,
        &["Country", "Nation", "Pays", "País"],
    ),
];

static DEFAULT_REGISTRY: OnceLock<CanonicalFieldRegistry> = OnceLock::new();

/// Returns the process-wide built-in registry.
///
/// Built on first access and never mutated afterwards.
pub fn default_registry() -> &'static CanonicalFieldRegistry {
    DEFAULT_REGISTRY.get_or_init(CanonicalFieldRegistry::builtin)
}

/// Ordered, read-only table of canonical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFieldRegistry {
    fields: Vec<CanonicalField>,
    by_name: BTreeMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    fields: Vec<CanonicalField>,
}

impl CanonicalFieldRegistry {
    /// Builds a registry, validating names and variants.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, malformed, reserved or duplicate names and
    /// for fields without any variant.
    pub fn new(fields: Vec<CanonicalField>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for (idx, field) in fields.iter().enumerate() {
            validate_field(field)?;
            if by_name.insert(field.name.clone(), idx).is_some() {
                return Err(ModelError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        Ok(Self { fields, by_name })
    }

    /// The built-in business table used for contact spreadsheets.
    pub fn builtin() -> Self {
        let fields = BUILTIN_FIELDS
            .iter()
            .map(|(name, label, required, variants)| {
                CanonicalField::new(
                    *name,
                    variants.iter().map(|v| (*v).to_string()).collect(),
                    *required,
                )
                .with_label(*label)
            })
            .collect::<Vec<_>>();
        let by_name = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name.clone(), idx))
            .collect();
        Self { fields, by_name }
    }

    /// Parses a registry from a TOML document with a `[[fields]]` array.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] for malformed TOML and the validation
    /// errors of [`Self::new`] otherwise.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let document: RegistryDocument = toml::from_str(raw).map_err(|e| ModelError::Parse {
            message: e.to_string(),
        })?;
        Self::new(document.fields)
    }

    /// Looks up a field by its exact canonical name.
    pub fn get(&self, name: &str) -> Option<&CanonicalField> {
        self.by_name.get(name).map(|idx| &self.fields[*idx])
    }

    /// Returns true if `name` is a canonical field.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All fields in registry order.
    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    /// Fields flagged as required, in registry order.
    pub fn required_fields(&self) -> Vec<&CanonicalField> {
        self.fields.iter().filter(|f| f.required).collect()
    }

    /// Canonical names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for CanonicalFieldRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_field(field: &CanonicalField) -> Result<()> {
    let name = field.name.as_str();
    if name.is_empty() {
        return Err(ModelError::EmptyFieldName);
    }
    let well_formed = name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
    if !well_formed {
        return Err(ModelError::InvalidFieldName {
            name: name.to_string(),
        });
    }
    if name == IGNORE_KEYWORD {
        return Err(ModelError::ReservedFieldName {
            name: name.to_string(),
        });
    }
    if field.variants.iter().all(|v| v.trim().is_empty()) {
        return Err(ModelError::NoVariants {
            name: name.to_string(),
        });
    }
    Ok(())
}
