//! CSV and Markdown renderings of table items.

use crate::error::{Error, Result};
use crate::model::{Document, Item, TableGrid};
use std::fs;
use std::path::Path;

/// Outcome of exporting the tables of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
    /// Tables found in the document
    pub found: usize,

    /// Representations (CSV or Markdown) written
    pub written: usize,

    /// Representations that failed
    pub failed: usize,
}

/// Render a grid as CSV, header row first.
pub fn to_csv(grid: &TableGrid) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !grid.columns.is_empty() {
        writer.write_record(&grid.columns)?;
    }
    for row in &grid.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Render(format!("CSV buffer: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("CSV encoding: {}", e)))
}

/// Render a grid as a Markdown pipe table.
///
/// Columns are padded to a common width. A column whose non-empty body
/// cells are all numbers is right-aligned.
pub fn to_markdown_table(grid: &TableGrid) -> Result<String> {
    if grid.column_count() == 0 {
        return Err(Error::MissingCapability(
            "markdown export of a table without columns".to_string(),
        ));
    }

    let header: Vec<String> = grid.columns.iter().map(|c| escape_cell(c)).collect();
    let body: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| row.iter().map(|c| escape_cell(c)).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            body.iter()
                .filter_map(|row| row.get(col))
                .chain(std::iter::once(&header[col]))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect();
    let numeric: Vec<bool> = (0..header.len())
        .map(|col| is_numeric_column(grid, col))
        .collect();

    let mut output = String::new();
    push_row(&mut output, &header, &widths, &numeric);

    output.push('|');
    for (width, right) in widths.iter().zip(&numeric) {
        if *right {
            output.push_str(&"-".repeat(width + 1));
            output.push(':');
        } else {
            output.push(':');
            output.push_str(&"-".repeat(width + 1));
        }
        output.push('|');
    }

    for row in &body {
        output.push('\n');
        push_row(&mut output, row, &widths, &numeric);
    }
    Ok(output)
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize], numeric: &[bool]) {
    output.push('|');
    for (col, width) in widths.iter().enumerate() {
        let cell = cells.get(col).map(String::as_str).unwrap_or("");
        if numeric[col] {
            output.push_str(&format!(" {:>width$} |", cell, width = width));
        } else {
            output.push_str(&format!(" {:<width$} |", cell, width = width));
        }
    }
}

fn is_numeric_column(grid: &TableGrid, col: usize) -> bool {
    let mut values = grid
        .rows
        .iter()
        .filter_map(|row| row.get(col))
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .peekable();
    values.peek().is_some() && values.all(|c| c.replace(',', "").parse::<f64>().is_ok())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Write `{base}_table_{i}.csv` and `{base}_table_{i}.md` for every table.
///
/// Tables are numbered from 1 across the whole document. The two files are
/// written independently: a table that cannot be rendered as Markdown still
/// gets its CSV.
pub fn export_tables(doc: &Document, tables_dir: &Path, base: &str) -> TableSummary {
    let mut summary = TableSummary::default();

    for (number, (index, item)) in doc.tables().enumerate() {
        let number = number + 1;
        summary.found += 1;

        let Item::Table(table_item) = item else {
            continue;
        };
        let grid = match table_item.table.grid() {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!(
                    "{}: table {} (item #{}) has no usable grid: {}",
                    doc.name,
                    number,
                    index,
                    e
                );
                summary.failed += 2;
                continue;
            }
        };

        let csv_path = tables_dir.join(format!("{}_table_{}.csv", base, number));
        match to_csv(&grid).and_then(|csv| Ok(fs::write(&csv_path, csv)?)) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                log::warn!("{}: failed to write table {} as CSV: {}", doc.name, number, e);
                summary.failed += 1;
            }
        }

        let md_path = tables_dir.join(format!("{}_table_{}.md", base, number));
        match to_markdown_table(&grid).and_then(|md| Ok(fs::write(&md_path, md)?)) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                log::warn!(
                    "{}: failed to write table {} as Markdown: {}",
                    doc.name,
                    number,
                    e
                );
                summary.failed += 1;
            }
        }
    }

    if summary.found > 0 {
        log::debug!(
            "{}: exported {} of {} table files",
            doc.name,
            summary.written,
            summary.found * 2
        );
    }
    summary
}
