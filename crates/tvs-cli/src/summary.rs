use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use serde_json::Value;
use tvs_core::cell_text;
use tvs_model::{ColumnDef, ViewRow, describe_filtered, describe_sorted};

use crate::replay::{CycleSummary, ReplayReport};

/// One plain-text line per cycle.
pub fn cycle_line(cycle: &CycleSummary) -> String {
    let mut line = format!(
        "{} {}: page {}/{} size {} rows {} sort {} filter {} expanded {}",
        cycle.step,
        cycle.event,
        cycle.page,
        cycle.pages,
        cycle.page_size,
        cycle.rows,
        describe_sorted(&cycle.sorted),
        describe_filtered(&cycle.filtered),
        cycle.expanded,
    );
    if cycle.frozen {
        line.push_str(" frozen");
    }
    if cycle.fetched {
        line.push_str(" fetch");
    }
    line
}

pub fn report_lines(report: &ReplayReport) -> String {
    report
        .cycles
        .iter()
        .map(cycle_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_report(report: &ReplayReport, show_rows: bool) {
    println!("{}", cycle_table(report));
    println!("Fetch requests: {}", report.fetches);
    if !report.widths.is_empty() {
        println!("Column widths: {}", width_line(report));
    }
    if show_rows {
        println!();
        println!("Final page:");
        if report.page_rows.is_empty() {
            println!("(no rows on this page)");
        } else {
            println!("{}", rows_table(&report.columns, &report.page_rows));
        }
    }
}

/// Final column widths as `"id 120, name 180"`.
pub fn width_line(report: &ReplayReport) -> String {
    report
        .widths
        .iter()
        .map(|(key, width)| format!("{key} {width}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn cycle_table(report: &ReplayReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Event"),
        header_cell("Page"),
        header_cell("Pages"),
        header_cell("Size"),
        header_cell("Rows"),
        header_cell("Sorted"),
        header_cell("Filtered"),
        header_cell("Expanded"),
        header_cell("Frozen"),
        header_cell("Fetch"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for index in [0, 2, 3, 4, 5, 8] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 9, CellAlignment::Center);
    align_column(&mut table, 10, CellAlignment::Center);

    for cycle in &report.cycles {
        table.add_row(vec![
            dim_cell(cycle.step),
            Cell::new(&cycle.event)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(cycle.page),
            Cell::new(cycle.pages),
            Cell::new(cycle.page_size),
            Cell::new(cycle.rows),
            spec_cell(describe_sorted(&cycle.sorted)),
            spec_cell(describe_filtered(&cycle.filtered)),
            count_cell(cycle.expanded),
            flag_cell(cycle.frozen, Color::Yellow),
            flag_cell(cycle.fetched, Color::Green),
        ]);
    }
    table
}

pub fn rows_table(columns: &[ColumnDef], rows: &[ViewRow]) -> Table {
    let mut table = Table::new();
    table.set_header(
        columns
            .iter()
            .map(|column| header_cell(column.header()))
            .collect::<Vec<_>>(),
    );
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for row in rows {
        let cells = row_cells(columns, row);
        if row.is_group() {
            table.add_row(cells.into_iter().map(|text| {
                Cell::new(text)
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold)
            }));
        } else {
            table.add_row(cells);
        }
    }
    table
}

/// Display text of a row, one entry per column.
///
/// Group rows show their group value and sub-row count under the pivot
/// column and nothing elsewhere.
pub fn row_cells(columns: &[ColumnDef], row: &ViewRow) -> Vec<String> {
    columns
        .iter()
        .map(|column| match &row.group {
            Some(group) if group.key == column.key => {
                format!("{} ({})", cell_text(&group.value), row.sub_rows.len())
            }
            Some(_) => String::new(),
            None => cell_text(row.values.get(&column.key).unwrap_or(&Value::Null)),
        })
        .collect()
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

fn spec_cell(text: String) -> Cell {
    if text == "-" {
        dim_cell(text)
    } else {
        Cell::new(text)
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn flag_cell(flag: bool, color: Color) -> Cell {
    if flag {
        Cell::new("✓").fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
