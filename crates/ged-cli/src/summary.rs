//! Conversion statistics rendering for `--summary`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use ged_core::ConversionStats;

use crate::cli::SummaryFormatArg;

/// Print `stats` to stderr in the chosen format.
pub fn print_summary(stats: &ConversionStats, format: SummaryFormatArg) -> anyhow::Result<()> {
    match format {
        SummaryFormatArg::Table => eprintln!("{}", summary_table(stats)),
        SummaryFormatArg::Json => eprintln!("{}", serde_json::to_string_pretty(stats)?),
    }
    Ok(())
}

/// Two-column table of every counter, grouped by stage.
pub fn summary_table(stats: &ConversionStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table.add_row(vec![
        Cell::new("Source encoding"),
        Cell::new(stats.source_encoding.label()),
    ]);
    let rows = [
        ("Records read", stats.records),
        ("Structures read", stats.structures),
        ("Irregular lines", stats.irregular_lines),
        ("Renamed", stats.renamed),
        ("Restructured", stats.restructured),
        ("Dropped", stats.dropped),
        ("Enumerations matched", stats.enum_matched),
        ("Phrases added", stats.phrases_added),
        ("Phrases omitted", stats.phrases_omitted),
        ("Records written", stats.records_written),
        ("Lines written", stats.lines_written),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), count_cell(label, value)]);
    }
    table.add_row(vec![
        Cell::new("Rewritten")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.rewritten()).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn count_cell(label: &str, value: usize) -> Cell {
    match (label, value) {
        (_, 0) => Cell::new(value).fg(Color::DarkGrey),
        ("Irregular lines" | "Phrases omitted", _) => Cell::new(value).fg(Color::Yellow),
        _ => Cell::new(value),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
