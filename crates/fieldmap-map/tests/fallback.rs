//! Integration tests for fallback decisions and row projection.

use std::collections::BTreeMap;

use fieldmap_map::{
    MappingError, MappingResolver, RowProjector, apply_overrides, blocking_fields,
    decide_fallbacks,
};
use fieldmap_model::{CanonicalField, FallbackStrategy, MappingReport, default_registry};

fn resolve(headers: &[&str]) -> MappingReport {
    MappingResolver::new(default_registry()).unwrap().resolve(headers)
}

fn row(cells: &[(&str, &str)]) -> BTreeMap<String, String> {
    cells
        .iter()
        .map(|(header, value)| ((*header).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn missing_required_fields_get_policy_decisions() {
    let report = resolve(&["First Name", "Random Column"]);
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());

    assert_eq!(decisions.len(), 2);

    let company = &decisions[0];
    assert_eq!(company.field_name, "company_name");
    assert_eq!(company.strategy, FallbackStrategy::DefaultValue);
    assert_eq!(company.value.as_deref(), Some("[Company]"));
    assert_eq!(company.reason, "required for personalization, using placeholder");

    let email = &decisions[1];
    assert_eq!(email.field_name, "email");
    assert_eq!(email.strategy, FallbackStrategy::Error);
    assert!(email.value.is_none());
    assert_eq!(email.reason, "required for delivery, cannot proceed without");

    assert_eq!(blocking_fields(&decisions), vec!["email"]);
}

#[test]
fn suggested_mapping_does_not_satisfy_a_required_field() {
    let report = resolve(&["Fname", "Company", "Email Address"]);
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].field_name, "first_name");
    assert_eq!(decisions[0].value.as_deref(), Some("[First Name]"));
    assert!(blocking_fields(&decisions).is_empty());
}

#[test]
fn ignored_header_leaves_its_field_unresolved() {
    let report = resolve(&["First Name", "Company", "Email Address"]);
    let report = apply_overrides(
        default_registry(),
        report,
        &BTreeMap::from([("Email Address".to_string(), "ignore".to_string())]),
    )
    .unwrap();
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());
    assert_eq!(decisions.len(), 1);
    assert!(decisions[0].is_blocking());
}

#[test]
fn fully_mapped_report_needs_no_fallback() {
    let report = resolve(&["First Name", "Company Name", "Email Address"]);
    assert!(decide_fallbacks(&report, &default_registry().required_fields()).is_empty());
}

#[test]
fn non_critical_required_field_is_optional() {
    let phone = CanonicalField::new("phone", vec!["Phone".to_string()], true);
    let report = resolve(&["First Name"]);
    let decisions = decide_fallbacks(&report, &[&phone]);

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].strategy, FallbackStrategy::Optional);
    assert_eq!(decisions[0].reason, "non-essential field, can be omitted");
}

#[test]
fn decisions_are_deterministic_and_deduplicated() {
    let registry = default_registry();
    let email = registry.get("email").unwrap();
    let company = registry.get("company_name").unwrap();
    let report = resolve(&["Random Column"]);

    let required = [email, company, email];
    let first = decide_fallbacks(&report, &required);
    let second = decide_fallbacks(&report, &required);

    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|d| d.field_name.as_str()).collect();
    assert_eq!(names, vec!["email", "company_name"]);
}

#[test]
fn projector_refuses_blocked_pipeline() {
    let report = resolve(&["First Name", "Random Column"]);
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());
    let err = RowProjector::new(&report, &decisions).unwrap_err();

    assert_eq!(
        err,
        MappingError::PipelineBlocked {
            fields: vec!["email".to_string()],
        }
    );
    assert_eq!(err.to_string(), "Required fields cannot be resolved: email");
}

#[test]
fn projector_maps_cells_and_fills_placeholders() {
    let report = resolve(&["Email Address", "Job Title", "Notes"]);
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());
    let projector = RowProjector::new(&report, &decisions).unwrap();

    let fields: Vec<&str> = projector.fields().collect();
    assert_eq!(
        fields,
        vec!["email", "job_title", "first_name", "company_name"]
    );

    let records = projector.project_all(&[
        row(&[
            ("Email Address", " ada@example.com "),
            ("Job Title", "Engineer"),
            ("Notes", "met at conference"),
        ]),
        row(&[("Email Address", "grace@example.com"), ("Job Title", "   ")]),
    ]);

    assert_eq!(
        records[0],
        row(&[
            ("company_name", "[Company]"),
            ("email", "ada@example.com"),
            ("first_name", "[First Name]"),
            ("job_title", "Engineer"),
        ])
    );
    assert_eq!(
        records[1],
        row(&[
            ("company_name", "[Company]"),
            ("email", "grace@example.com"),
            ("first_name", "[First Name]"),
        ])
    );
}

#[test]
fn blank_personalization_cell_uses_placeholder() {
    let report = resolve(&["First Name", "Company", "Email Address"]);
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());
    assert!(decisions.is_empty());

    let projector = RowProjector::new(&report, &decisions).unwrap();
    let record = projector.project(&row(&[
        ("First Name", ""),
        ("Company", "Acme"),
        ("Email Address", "x@acme.test"),
    ]));
    assert_eq!(
        record.get("first_name").map(String::as_str),
        Some("[First Name]")
    );
    assert_eq!(record.get("company_name").map(String::as_str), Some("Acme"));
}
