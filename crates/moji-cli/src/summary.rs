use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use moji_ingest::MappingSummary;

use crate::processor::ProcessReport;

pub fn print_report(report: &ProcessReport) {
    println!("{}", render_report(report));
}

/// The run report as a two-column table.
pub fn render_report(report: &ProcessReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Value")]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Left);

    table.add_row(vec![label_cell("Status"), status_cell(report.warned)]);
    table.add_row(vec![
        label_cell("Input"),
        Cell::new(format!(
            "{} ({} rows)",
            report.input_path.display(),
            report.input_rows
        )),
    ]);
    table.add_row(vec![
        label_cell("Output"),
        Cell::new(format!(
            "{} ({} rows)",
            report.output_path.display(),
            report.output_rows
        )),
    ]);
    table.add_row(vec![label_cell("Processed rows"), Cell::new(report.processed_rows)]);
    table.add_row(vec![
        label_cell("Kept original"),
        count_cell(report.kept_original_rows, Color::Yellow),
    ]);
    table.add_row(vec![
        label_cell("Replaced with '?'"),
        count_cell(report.replaced_characters, Color::Yellow),
    ]);
    table.add_row(vec![label_cell("Conversion rules"), Cell::new(report.rule_count)]);
    table.add_row(vec![
        label_cell("Target columns"),
        Cell::new(format_columns(&report.target_columns)),
    ]);
    table
}

pub fn print_mapping_summary(summary: &MappingSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Entries")]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![label_cell("Source rows"), Cell::new(summary.source_rows)]);
    table.add_row(vec![label_cell("MJ → HK"), Cell::new(summary.mj_to_hk)]);
    table.add_row(vec![label_cell("HK → MJ"), Cell::new(summary.hk_to_mj)]);
    println!("{table}");
}

fn format_columns(columns: &[i64]) -> String {
    let joined = columns
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

fn status_cell(warned: bool) -> Cell {
    if warned {
        Cell::new("completed with warnings")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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

fn label_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report(warned: bool) -> ProcessReport {
        ProcessReport {
            input_path: PathBuf::from("data/in.csv"),
            output_path: PathBuf::from("data/out.csv"),
            input_rows: 4,
            output_rows: 4,
            processed_rows: 3,
            kept_original_rows: 0,
            replaced_characters: 1,
            rule_count: 2,
            target_columns: vec![1, 2],
            warned,
        }
    }

    #[test]
    fn test_format_columns() {
        assert_eq!(format_columns(&[1, 2]), "[1, 2]");
        assert_eq!(format_columns(&[-1]), "[-1]");
        assert_eq!(format_columns(&[]), "[]");
    }

    #[test]
    fn test_report_table_lists_the_run() {
        let mut table = render_report(&report(false));
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(rendered.contains("data/in.csv (4 rows)"));
        assert!(rendered.contains("[1, 2]"));
        assert!(rendered.contains("ok"));
    }

    #[test]
    fn test_warned_status() {
        let mut table = render_report(&report(true));
        table.force_no_tty();
        assert!(table.to_string().contains("completed with warnings"));
    }

    #[test]
    fn test_report_json() {
        insta::assert_json_snapshot!(report(true), @r#"
        {
          "input_path": "data/in.csv",
          "output_path": "data/out.csv",
          "input_rows": 4,
          "output_rows": 4,
          "processed_rows": 3,
          "kept_original_rows": 0,
          "replaced_characters": 1,
          "rule_count": 2,
          "target_columns": [
            1,
            2
          ],
          "warned": true
        }
        "#);
    }
}
