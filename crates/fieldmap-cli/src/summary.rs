use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use anyhow::{Context, Result};
use fieldmap_cli::session::SessionOutcome;
use fieldmap_model::{
    Alternative, CanonicalField, FallbackDecision, FallbackStrategy, HeaderResolution,
    MappingSource, Tier,
};

pub fn print_summary(outcome: &SessionOutcome) {
    println!("{}", outcome.report.summary());
    println!("{}", resolution_table(outcome.report.resolutions()));
    if !outcome.fallbacks.is_empty() {
        println!();
        println!("Fallbacks:");
        println!("{}", fallback_table(&outcome.fallbacks));
    }
    let blocked = outcome.blocking_fields();
    if !blocked.is_empty() {
        eprintln!("Errors:");
        for field in blocked {
            eprintln!("- required field '{field}' has no mapping");
        }
    }
}

pub fn print_json(outcome: &SessionOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serialize outcome")?;
    println!("{json}");
    Ok(())
}

pub fn print_fields(fields: &[&CanonicalField]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Required"),
        header_cell("Variants"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in fields {
        table.add_row(vec![
            Cell::new(&field.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(field.display_label()),
            if field.required {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("-")
            },
            Cell::new(field.variants.join(", ")),
        ]);
    }
    println!("{table}");
}

fn resolution_table(resolutions: &[HeaderResolution]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Tier"),
        header_cell("Source"),
        header_cell("Alternatives"),
        header_cell("Note"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for resolution in resolutions {
        table.add_row(vec![
            Cell::new(&resolution.original_header),
            match &resolution.matched_field {
                Some(field) => Cell::new(field),
                None => dim_cell("-"),
            },
            Cell::new(format_confidence(resolution.confidence)),
            tier_cell(resolution.tier),
            source_cell(resolution.mapping_type),
            match format_alternatives(&resolution.alternatives) {
                Some(text) => Cell::new(text),
                None => dim_cell("-"),
            },
            match &resolution.reason {
                Some(reason) => dim_cell(reason),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

fn fallback_table(decisions: &[FallbackDecision]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Strategy"),
        header_cell("Value"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for decision in decisions {
        table.add_row(vec![
            Cell::new(&decision.field_name),
            strategy_cell(decision.strategy),
            match &decision.value {
                Some(value) => Cell::new(value),
                None => dim_cell("-"),
            },
            Cell::new(&decision.reason),
        ]);
    }
    table
}

fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.2}")
}

fn format_alternatives(alternatives: &[Alternative]) -> Option<String> {
    if alternatives.is_empty() {
        return None;
    }
    let text = alternatives
        .iter()
        .map(|alt| format!("{} ({})", alt.field, format_confidence(alt.confidence)))
        .collect::<Vec<_>>()
        .join(", ");
    Some(text)
}

fn tier_cell(tier: Tier) -> Cell {
    match tier {
        Tier::Confirmed => Cell::new("CONFIRMED").fg(Color::Green),
        Tier::Suggested => Cell::new("SUGGESTED").fg(Color::Yellow),
        Tier::Unmappable => Cell::new("UNMAPPABLE")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn source_cell(source: MappingSource) -> Cell {
    match source {
        MappingSource::Automatic => dim_cell(source),
        MappingSource::UserConfirmed => Cell::new(source).fg(Color::Cyan),
        MappingSource::Ignored => Cell::new(source).fg(Color::DarkGrey),
    }
}

fn strategy_cell(strategy: FallbackStrategy) -> Cell {
    match strategy {
        FallbackStrategy::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FallbackStrategy::DefaultValue => Cell::new("DEFAULT").fg(Color::Yellow),
        FallbackStrategy::Optional => dim_cell("OPTIONAL"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
