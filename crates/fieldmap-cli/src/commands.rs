use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fieldmap_cli::session::{SessionOutcome, run_session};
use fieldmap_map::{FieldScorer, ResolverConfig};
use fieldmap_model::{CanonicalFieldRegistry, default_registry};
use tracing::{debug, info};

use crate::cli::{FieldsArgs, RegistryArgs, ResolveArgs};
use crate::summary::print_fields;

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let registry = load_registry(&args.registry)?;
    let fields: Vec<_> = if args.required {
        registry.required_fields()
    } else {
        registry.fields().iter().collect()
    };
    print_fields(&fields);
    Ok(())
}

pub fn run_resolve(args: &ResolveArgs) -> Result<SessionOutcome> {
    let registry = load_registry(&args.registry)?;
    let config = load_config(args)?;
    let overrides = collect_overrides(&args.overrides)?;
    let outcome = run_session(&registry, config, &args.headers, &overrides)
        .context("resolve headers")?;
    info!(
        headers = args.headers.len(),
        mapped = outcome.mapping.len(),
        fallbacks = outcome.fallbacks.len(),
        blocked = outcome.is_blocked(),
        "session finished"
    );
    Ok(outcome)
}

fn load_registry(args: &RegistryArgs) -> Result<Cow<'static, CanonicalFieldRegistry>> {
    let Some(path) = &args.registry else {
        return Ok(Cow::Borrowed(default_registry()));
    };
    let raw = read_file(path)?;
    let registry = CanonicalFieldRegistry::from_toml_str(&raw)
        .with_context(|| format!("parse registry {}", path.display()))?;
    FieldScorer::new(&registry)
        .with_context(|| format!("check registry variants in {}", path.display()))?;
    debug!(path = %path.display(), fields = registry.len(), "loaded registry");
    Ok(Cow::Owned(registry))
}

fn load_config(args: &ResolveArgs) -> Result<ResolverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = read_file(path)?;
            ResolverConfig::from_toml_str(&raw)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => ResolverConfig::default(),
    };
    if let Some(preset) = args.thresholds {
        config = config.with_thresholds(preset.into());
    }
    if let Some(policy) = args.duplicate_policy {
        config = config.with_duplicate_policy(policy.into());
    }
    Ok(config)
}

/// Overrides keyed by header; repeating a header on the command line is an error.
fn collect_overrides(pairs: &[(String, String)]) -> Result<BTreeMap<String, String>> {
    let mut overrides = BTreeMap::new();
    for (header, value) in pairs {
        if overrides.insert(header.clone(), value.clone()).is_some() {
            bail!("header '{header}' is overridden more than once");
        }
    }
    Ok(overrides)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_override_header_is_rejected() {
        let pairs = vec![
            ("Mail".to_string(), "email".to_string()),
            ("Mail".to_string(), "ignore".to_string()),
        ];
        assert!(collect_overrides(&pairs).is_err());
    }

    #[test]
    fn overrides_are_keyed_by_header() {
        let pairs = vec![
            ("Mail".to_string(), "email".to_string()),
            ("Fname".to_string(), "first_name".to_string()),
        ];
        let overrides = collect_overrides(&pairs).unwrap();
        assert_eq!(overrides.get("Fname").map(String::as_str), Some("first_name"));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn builtin_registry_is_borrowed() {
        let registry = load_registry(&RegistryArgs { registry: None }).unwrap();
        assert!(matches!(registry, Cow::Borrowed(_)));
    }
}
