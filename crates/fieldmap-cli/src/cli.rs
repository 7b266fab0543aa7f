//! CLI argument definitions for the field mapper.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fieldmap_map::{ConfidenceThresholds, DuplicatePolicy};
use fieldmap_cli::session::parse_override;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Resolve spreadsheet headers to canonical contact fields",
    long_about = "Resolve spreadsheet headers to canonical contact fields.\n\n\
                  Headers are normalized and fuzzy-matched against a field registry,\n\
                  sorted into confirmed, suggested and unmappable tiers, and checked\n\
                  for required fields that still need a fallback."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve headers, apply overrides and report fallbacks.
    Resolve(ResolveArgs),

    /// List the canonical fields of the registry.
    Fields(FieldsArgs),
}

#[derive(Args)]
pub struct RegistryArgs {
    /// TOML file with a `[[fields]]` table to use instead of the built-in registry.
    #[arg(long = "registry", value_name = "PATH")]
    pub registry: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Spreadsheet headers, in column order.
    #[arg(value_name = "HEADER", required = true)]
    pub headers: Vec<String>,

    /// Override one header: a canonical field name or `ignore` (repeatable).
    #[arg(long = "override", value_name = "HEADER=FIELD", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Resolver configuration file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Threshold preset (replaces thresholds from --config).
    #[arg(long = "thresholds", value_enum)]
    pub thresholds: Option<ThresholdsArg>,

    /// Which header keeps a field when several confirm it.
    #[arg(long = "duplicate-policy", value_enum)]
    pub duplicate_policy: Option<DuplicatePolicyArg>,

    /// Print the outcome as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Only list required fields.
    #[arg(long = "required")]
    pub required: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThresholdsArg {
    Strict,
    Default,
    Relaxed,
}

impl From<ThresholdsArg> for ConfidenceThresholds {
    fn from(value: ThresholdsArg) -> Self {
        match value {
            ThresholdsArg::Strict => ConfidenceThresholds::strict(),
            ThresholdsArg::Default => ConfidenceThresholds::default(),
            ThresholdsArg::Relaxed => ConfidenceThresholds::relaxed(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicatePolicyArg {
    LastWins,
    FirstWins,
}

impl From<DuplicatePolicyArg> for DuplicatePolicy {
    fn from(value: DuplicatePolicyArg) -> Self {
        match value {
            DuplicatePolicyArg::LastWins => DuplicatePolicy::LastWins,
            DuplicatePolicyArg::FirstWins => DuplicatePolicy::FirstWins,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
