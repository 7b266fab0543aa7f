//! Tests for canonical field registry construction.

use fieldmap_model::{CanonicalField, CanonicalFieldRegistry, ModelError, default_registry};

const CUSTOM_REGISTRY: &str = r#"
[[fields]]
name = "first_name"
label = "First Name"
required = true
variants = ["First Name", "Given Name"]

[[fields]]
name = "donor_tier"
variants = ["Tier", "Donor Level"]
"#;

#[test]
fn loads_registry_from_toml() {
    let registry = CanonicalFieldRegistry::from_toml_str(CUSTOM_REGISTRY).expect("parse registry");

    assert_eq!(registry.len(), 2);
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["first_name", "donor_tier"]);

    let tier = registry.get("donor_tier").expect("donor_tier present");
    assert!(!tier.required);
    assert_eq!(tier.display_label(), "donor_tier");
    assert_eq!(
        registry.get("first_name").map(CanonicalField::display_label),
        Some("First Name")
    );
}

#[test]
fn rejects_duplicate_field_names() {
    let raw = r#"
[[fields]]
name = "email"
variants = ["Email"]

[[fields]]
name = "email"
variants = ["Mail"]
"#;
    let err = CanonicalFieldRegistry::from_toml_str(raw).unwrap_err();
    assert_eq!(
        err,
        ModelError::DuplicateField {
            name: "email".to_string()
        }
    );
}

#[test]
fn rejects_field_without_variants() {
    let raw = r#"
[[fields]]
name = "email"
variants = ["  "]
"#;
    let err = CanonicalFieldRegistry::from_toml_str(raw).unwrap_err();
    assert!(matches!(err, ModelError::NoVariants { .. }));
}

#[test]
fn reports_malformed_toml() {
    let err = CanonicalFieldRegistry::from_toml_str("fields = 3").unwrap_err();
    assert!(matches!(err, ModelError::Parse { .. }));
}

#[test]
fn default_registry_is_shared() {
    let a = default_registry();
    let b = default_registry();
    assert!(std::ptr::eq(a, b));
    assert!(a.contains("email"));
    assert!(!a.contains("ignore"));
}

#[test]
fn builtin_variant_spellings_are_unique_per_field() {
    let registry = CanonicalFieldRegistry::builtin();
    for field in registry.fields() {
        let mut seen = std::collections::BTreeSet::new();
        for variant in &field.variants {
            assert!(
                seen.insert(variant.to_lowercase()),
                "{} lists '{}' twice",
                field.name,
                variant
            );
        }
    }
}
