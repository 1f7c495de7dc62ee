//! Table types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A table structure as recognized by the upstream parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Table caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// HTML rendering supplied by the parser, used verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of leading header rows.
    pub fn header_rows(&self) -> usize {
        self.rows.iter().take_while(|r| r.is_header).count()
    }

    /// Lay the table out on a rectangular grid.
    ///
    /// Spanned cells are repeated over every slot they cover and short rows
    /// are padded with empty strings. When the first row is a header row its
    /// texts become the column names; otherwise columns are numbered.
    pub fn grid(&self) -> Result<TableGrid> {
        let row_count = self.rows.len();
        let mut slots: Vec<Vec<Option<String>>> = vec![Vec::new(); row_count];

        for (r, row) in self.rows.iter().enumerate() {
            let mut c = 0;
            for cell in &row.cells {
                if cell.rowspan == 0 || cell.colspan == 0 {
                    return Err(Error::MalformedItem(format!(
                        "table cell at row {} has a zero span",
                        r + 1
                    )));
                }
                while slots[r].get(c).is_some_and(|s| s.is_some()) {
                    c += 1;
                }
                let last_row = (r + cell.rowspan as usize).min(row_count);
                for target in slots.iter_mut().take(last_row).skip(r) {
                    let needed = c + cell.colspan as usize;
                    if target.len() < needed {
                        target.resize(needed, None);
                    }
                    for slot in &mut target[c..needed] {
                        *slot = Some(cell.text.clone());
                    }
                }
                c += cell.colspan as usize;
            }
        }

        let width = slots.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid: Vec<Vec<String>> = slots
            .into_iter()
            .map(|row| {
                let mut row: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
                row.resize(width, String::new());
                row
            })
            .collect();

        let columns = if self.rows.first().is_some_and(|r| r.is_header) {
            grid.remove(0)
        } else {
            (0..width).map(|i| i.to_string()).collect()
        };

        Ok(TableGrid {
            columns,
            rows: grid,
        })
    }

    /// HTML rendering of the table.
    pub fn to_html(&self) -> String {
        if let Some(ref html) = self.html {
            return html.clone();
        }

        let mut output = String::from("<table>");
        let header_rows = self.header_rows();
        if header_rows > 0 {
            output.push_str("<thead>");
            for row in &self.rows[..header_rows] {
                render_html_row(&mut output, row, true);
            }
            output.push_str("</thead>");
        }
        output.push_str("<tbody>");
        for row in &self.rows[header_rows..] {
            render_html_row(&mut output, row, false);
        }
        output.push_str("</tbody></table>");
        output
    }
}

fn render_html_row(output: &mut String, row: &TableRow, is_header: bool) {
    let tag = if is_header { "th" } else { "td" };
    output.push_str("<tr>");

    for cell in &row.cells {
        let mut attrs = String::new();
        if cell.rowspan > 1 {
            attrs.push_str(&format!(" rowspan=\"{}\"", cell.rowspan));
        }
        if cell.colspan > 1 {
            attrs.push_str(&format!(" colspan=\"{}\"", cell.colspan));
        }
        output.push_str(&format!("<{}{}>", tag, attrs));
        output.push_str(&escape_html(&cell.text));
        output.push_str(&format!("</{}>", tag));
    }

    output.push_str("</tr>");
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    #[serde(default)]
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }
}

/// A table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text
    #[serde(default)]
    pub text: String,

    /// Number of rows this cell spans
    #[serde(default = "default_span")]
    pub rowspan: u8,

    /// Number of columns this cell spans
    #[serde(default = "default_span")]
    pub colspan: u8,
}

fn default_span() -> u8 {
    1
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rowspan: 1,
            colspan: 1,
        }
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u8) -> Self {
        self.colspan = span;
        self
    }

    /// Set rowspan and return self.
    pub fn rowspan(mut self, span: u8) -> Self {
        self.rowspan = span;
        self
    }
}

/// Rectangular, span-expanded view of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    /// Column names
    pub columns: Vec<String>,

    /// Body rows, each `columns.len()` wide
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new();
        table.add_row(TableRow::header(vec![
            TableCell::text("Name"),
            TableCell::text("Age"),
        ]));
        table.add_row(TableRow::from_strings(["Alice", "30"]));
        table.add_row(TableRow::from_strings(["Bob", "25"]));
        table
    }

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        let grid = table.grid().unwrap();
        assert_eq!(grid.column_count(), 0);
        assert!(grid.rows.is_empty());
    }

    #[test]
    fn test_grid_with_header() {
        let grid = sample_table().grid().unwrap();
        assert_eq!(grid.columns, vec!["Name", "Age"]);
        assert_eq!(grid.rows, vec![vec!["Alice", "30"], vec!["Bob", "25"]]);
    }

    #[test]
    fn test_grid_without_header_numbers_columns() {
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["a", "b", "c"]));
        table.add_row(TableRow::from_strings(["d"]));
        let grid = table.grid().unwrap();
        assert_eq!(grid.columns, vec!["0", "1", "2"]);
        assert_eq!(grid.rows[1], vec!["d", "", ""]);
    }

    #[test]
    fn test_grid_expands_spans() {
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![
            TableCell::text("Region").rowspan(2),
            TableCell::text("Q1-Q2").colspan(2),
        ]));
        table.add_row(TableRow::from_strings(["10", "20"]));
        let grid = table.grid().unwrap();
        assert_eq!(grid.rows[0], vec!["Region", "Q1-Q2", "Q1-Q2"]);
        assert_eq!(grid.rows[1], vec!["Region", "10", "20"]);
    }

    #[test]
    fn test_grid_rejects_zero_span() {
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![TableCell::text("x").colspan(0)]));
        assert!(matches!(table.grid(), Err(Error::MalformedItem(_))));
    }

    #[test]
    fn test_to_html_generated() {
        let html = sample_table().to_html();
        assert!(html.starts_with("<table><thead><tr><th>Name</th>"));
        assert!(html.contains("<tbody><tr><td>Alice</td><td>30</td></tr>"));
        assert!(html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_to_html_prefers_upstream() {
        let mut table = sample_table();
        table.html = Some("<table><tr><td>given</td></tr></table>".to_string());
        assert_eq!(table.to_html(), "<table><tr><td>given</td></tr></table>");
    }

    #[test]
    fn test_html_escaping_and_spans() {
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![TableCell::text("a < b & c").colspan(2)]));
        let html = table.to_html();
        assert!(html.contains("<td colspan=\"2\">a &lt; b &amp; c</td>"));
    }
}
