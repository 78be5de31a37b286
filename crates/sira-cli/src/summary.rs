//! Terminal rendering of run summaries and validation findings.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sira_model::{OutcomeStatus, QualityReport, RecordType, RunSummary, Severity};
use sira_schema::SchemaRegistry;

pub fn print_run_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Sheet"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);

    for outcome in &summary.outcomes {
        let (status, rows, detail) = match &outcome.status {
            OutcomeStatus::Loaded { rows } => (
                Cell::new("OK").fg(Color::Green).add_attribute(Attribute::Bold),
                Cell::new(rows),
                dim_cell("-"),
            ),
            OutcomeStatus::Failed { error } => (
                Cell::new("FAILED").fg(Color::Red).add_attribute(Attribute::Bold),
                dim_cell("-"),
                Cell::new(error),
            ),
        };
        table.add_row(vec![
            Cell::new(&outcome.source),
            Cell::new(outcome.record_type.sheet_name()),
            status,
            rows,
            detail,
        ]);
    }
    println!("{table}");
    println!(
        "{} operation(s) succeeded, {} failed, {} row(s) loaded",
        summary.succeeded(),
        summary.failed(),
        summary.total_rows()
    );
}

pub fn print_findings(
    file: &str,
    record_type: RecordType,
    rows: usize,
    columns: usize,
    report: &QualityReport,
) {
    println!();
    println!(
        "{file} / {sheet}: {rows} row(s), {columns} column(s)",
        sheet = record_type.sheet_name()
    );
    if report.findings.is_empty() {
        println!("  no findings; the sheet is ready for loading");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Check"),
        header_cell("Column"),
        header_cell("Row"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for finding in &report.findings {
        table.add_row(vec![
            severity_cell(finding.severity),
            Cell::new(finding.kind),
            finding
                .column
                .as_deref()
                .map(Cell::new)
                .unwrap_or_else(|| dim_cell("-")),
            finding
                .row
                .map(Cell::new)
                .unwrap_or_else(|| dim_cell("-")),
            finding
                .count
                .map(Cell::new)
                .unwrap_or_else(|| dim_cell("-")),
            Cell::new(&finding.message),
        ]);
    }
    println!("{table}");
    println!(
        "  {} warning(s), {} informational",
        report.warning_count(),
        report.info_count()
    );
}

pub fn print_schema(registry: &SchemaRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record type"),
        header_cell("Sheet / Table"),
        header_cell("Canonical columns"),
    ]);
    apply_table_style(&mut table);
    for record_type in RecordType::ALL {
        let fields = registry
            .canonical_fields_for(record_type)
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(record_type).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(record_type.sheet_name()),
            Cell::new(fields),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::DarkGrey),
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
