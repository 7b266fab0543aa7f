//! Integration tests for applying user overrides.

use std::collections::BTreeMap;

use fieldmap_map::{
    MappingError, MappingResolver, OverrideReconciler, apply_overrides, decide_fallbacks,
};
use fieldmap_model::{MappingReport, MappingSource, ResolutionReason, Tier, default_registry};

fn resolve(headers: &[&str]) -> MappingReport {
    MappingResolver::new(default_registry()).unwrap().resolve(headers)
}

fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(header, value)| ((*header).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn override_promotes_suggestion() {
    let report = resolve(&["First Name", "Comp Name", "Mail"]);
    assert_eq!(report.get("Mail").unwrap().tier, Tier::Suggested);

    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Mail", "email")]),
    )
    .unwrap();

    let mail = report.get("Mail").unwrap();
    assert_eq!(mail.tier, Tier::Confirmed);
    assert_eq!(mail.confidence, 1.0);
    assert_eq!(mail.matched_field.as_deref(), Some("email"));
    assert_eq!(mail.mapping_type, MappingSource::UserConfirmed);
    assert!(mail.reason.is_none());

    let mapping = report.final_mapping();
    assert_eq!(mapping.get("email").map(String::as_str), Some("Mail"));
    assert_eq!(mapping.get("first_name").map(String::as_str), Some("First Name"));
    assert!(!mapping.contains_key("company_name"));
}

#[test]
fn override_can_redirect_an_unmappable_header() {
    let report = resolve(&["Mystery Header"]);
    let report = OverrideReconciler::new(default_registry())
        .apply(report, &overrides(&[("Mystery Header", "industry")]))
        .unwrap();

    let resolution = &report.resolutions()[0];
    assert_eq!(resolution.tier, Tier::Confirmed);
    assert_eq!(resolution.matched_field.as_deref(), Some("industry"));
    assert_eq!(report.summary().user_confirmed, 1);
}

#[test]
fn ignore_removes_header_from_mapping() {
    let report = resolve(&["First Name", "Email Address"]);
    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Email Address", "Ignore")]),
    )
    .unwrap();

    let email = report.get("Email Address").unwrap();
    assert_eq!(email.mapping_type, MappingSource::Ignored);
    assert!(!email.is_mapped());
    assert!(!report.final_mapping().contains_key("email"));
    assert_eq!(report.summary().ignored, 1);
}

#[test]
fn user_choice_demotes_automatic_holder() {
    let report = resolve(&["Email Address", "Mail"]);
    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Mail", "email")]),
    )
    .unwrap();

    let automatic = report.get("Email Address").unwrap();
    assert_eq!(automatic.tier, Tier::Suggested);
    assert_eq!(automatic.mapping_type, MappingSource::Automatic);
    assert_eq!(
        automatic.reason,
        Some(ResolutionReason::DuplicateTarget {
            field: "email".to_string(),
            winner: "Mail".to_string(),
        })
    );
    assert_eq!(
        report.final_mapping().get("email").map(String::as_str),
        Some("Mail")
    );
}

#[test]
fn unknown_field_is_rejected() {
    let report = resolve(&["Fname"]);
    let err = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Fname", "nonexistent_field")]),
    )
    .unwrap_err();

    assert_eq!(
        err,
        MappingError::UnknownField {
            header: "Fname".to_string(),
            field: "nonexistent_field".to_string(),
        }
    );
    assert_eq!(err.header(), Some("Fname"));
    assert_eq!(err.field(), Some("nonexistent_field"));
}

#[test]
fn unknown_header_is_rejected() {
    let report = resolve(&["Fname"]);
    let err = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Surname", "last_name")]),
    )
    .unwrap_err();
    assert_eq!(err, MappingError::UnknownHeader("Surname".to_string()));
}

#[test]
fn two_headers_cannot_claim_one_field() {
    let report = resolve(&["Fname", "Vorname"]);
    let err = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Fname", "first_name"), ("Vorname", "first_name")]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        MappingError::DuplicateOverrideTarget { ref field, .. } if field == "first_name"
    ));
}

#[test]
fn failed_override_changes_nothing() {
    let report = resolve(&["Fname", "Mail"]);
    let before = report.clone();
    let result = OverrideReconciler::new(default_registry()).apply(
        report.clone(),
        &overrides(&[("Fname", "first_name"), ("Mail", "bogus")]),
    );
    assert!(result.is_err());
    assert_eq!(report, before);
    assert_eq!(report.get("Fname").unwrap().tier, Tier::Suggested);
}

#[test]
fn applying_twice_is_idempotent() {
    let registry = default_registry();
    let choices = overrides(&[
        ("Mail", "email"),
        ("Comp Name", "company_name"),
        ("Random Column", "ignore"),
    ]);
    let report = resolve(&["First Name", "Comp Name", "Mail", "Random Column", "Email"]);

    let once = apply_overrides(registry, report, &choices).unwrap();
    let twice = apply_overrides(registry, once.clone(), &choices).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn empty_overrides_leave_report_untouched() {
    let report = resolve(&["First Name", "Fname", "名字"]);
    let applied = apply_overrides(default_registry(), report.clone(), &BTreeMap::new()).unwrap();
    assert_eq!(applied, report);
}

#[test]
fn repeated_header_receives_the_override_everywhere() {
    let report = resolve(&["Mail", "Mail"]);
    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Mail", "email")]),
    )
    .unwrap();
    assert!(
        report
            .resolutions()
            .iter()
            .all(|r| r.mapping_type == MappingSource::UserConfirmed)
    );
    assert_eq!(report.summary().user_confirmed, 2);
}

#[test]
fn summary_reflects_user_decisions() {
    let report = resolve(&["First Name", "Mail", "Mystery Header"]);
    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("Mail", "email"), ("Mystery Header", "ignore")]),
    )
    .unwrap();
    insta::assert_snapshot!(
        report.summary().to_string(),
        @"3 headers: 2 confirmed, 0 suggested, 1 unmappable (1 user-confirmed, 1 ignored)"
    );
}

#[test]
fn ignoring_duplicate_winner_confirms_the_demoted_header() {
    let report = resolve(&["Email", "E-mail"]);
    assert_eq!(report.get("Email").unwrap().tier, Tier::Suggested);

    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("E-mail", "ignore")]),
    )
    .unwrap();

    let email = report.get("Email").unwrap();
    assert_eq!(email.tier, Tier::Confirmed);
    assert_eq!(email.mapping_type, MappingSource::Automatic);
    assert!(email.reason.is_none());
    assert_eq!(
        report.final_mapping().get("email").map(String::as_str),
        Some("Email")
    );
    let decisions = decide_fallbacks(&report, &default_registry().required_fields());
    assert!(decisions.iter().all(|d| d.field_name != "email"));
}

#[test]
fn ignoring_duplicate_winner_points_at_the_remaining_holder() {
    let report = resolve(&["Email", "E-mail", "Mail"]);
    let report = apply_overrides(
        default_registry(),
        report,
        &overrides(&[("E-mail", "ignore"), ("Mail", "email")]),
    )
    .unwrap();

    let email = report.get("Email").unwrap();
    assert_eq!(email.tier, Tier::Suggested);
    assert_eq!(
        email.reason,
        Some(ResolutionReason::DuplicateTarget {
            field: "email".to_string(),
            winner: "Mail".to_string(),
        })
    );
    assert_eq!(
        report.final_mapping().get("email").map(String::as_str),
        Some("Mail")
    );
}

#[test]
fn only_the_orphaned_duplicate_is_confirmed_again() {
    let report = resolve(&["Email", "E-mail", "Email Address"]);
    let rules = overrides(&[("Email Address", "ignore")]);
    let once = apply_overrides(default_registry(), report, &rules).unwrap();

    assert_eq!(once.get("E-mail").unwrap().tier, Tier::Confirmed);
    let email = once.get("Email").unwrap();
    assert_eq!(email.tier, Tier::Suggested);
    assert_eq!(
        email.reason,
        Some(ResolutionReason::DuplicateTarget {
            field: "email".to_string(),
            winner: "E-mail".to_string(),
        })
    );

    let twice = apply_overrides(default_registry(), once.clone(), &rules).unwrap();
    assert_eq!(once, twice);
}
