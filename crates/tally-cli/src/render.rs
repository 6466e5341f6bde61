//! Terminal rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::fmt::Write;

use tally_map::MappingSummary;
use tally_model::{Mapping, SystemColumnId, schema};

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// The schema registry, one row per system column.
pub fn columns_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Inferable"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for id in schema::all() {
        let spec = schema::get(*id);
        table.add_row(vec![
            Cell::new(id.as_str()),
            Cell::new(spec.data_type),
            flag_cell(spec.required),
            flag_cell(spec.inferable),
            Cell::new(spec.description),
        ]);
    }
    table
}

/// Source columns and their targets, in input order.
pub fn mapping_table(mappings: &[Mapping]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source column"),
        header_cell("System column"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for mapping in mappings {
        let (target, required) = match mapping.system_column {
            Some(id) => (Cell::new(id.as_str()), flag_cell(schema::get(id).required)),
            None => (dim_cell("(unmapped)"), dim_cell("-")),
        };
        table.add_row(vec![Cell::new(&mapping.source_column), target, required]);
    }
    table
}

/// Plain-text list of missing required columns.
pub fn missing_report(missing: &[(SystemColumnId, &str)]) -> String {
    if missing.is_empty() {
        return "All required columns are mapped.\n".to_string();
    }
    let mut out = String::from("Missing required columns:\n");
    for (id, description) in missing {
        let _ = writeln!(out, "  - {id}: {description}");
    }
    out
}

/// One-line count summary.
pub fn summary_line(summary: &MappingSummary) -> String {
    format!(
        "{} of {} source columns mapped, {} of {} required columns covered",
        summary.mapped, summary.source_columns, summary.required_mapped, summary.required_total
    )
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("✓").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
