//! Delimited-text table loading
//!
//! Harness tables are comma-separated with a single header row. Columns are
//! addressed by header name; cells are parsed as `f64`, and anything that does
//! not parse (blank cells, `nan`, stray text) becomes `NaN` so a single bad
//! cell never costs the whole artifact.

use crate::error::{ReportError, Result};
use std::io::Read;
use std::path::Path;

/// A column-major numeric table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl Table {
    /// Build a table from column names and column-major data.
    ///
    /// Columns are truncated to the shortest length so every column has the
    /// same number of rows.
    pub fn new(columns: Vec<String>, mut data: Vec<Vec<f64>>) -> Self {
        data.resize(columns.len(), Vec::new());
        let rows = data.iter().map(Vec::len).min().unwrap_or(0);
        for column in &mut data {
            column.truncate(rows);
        }
        Self { columns, data }
    }

    /// Load a table from a CSV file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a table from any reader producing CSV text with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(ReportError::Empty("table has no header".to_string()));
        }

        let mut data = vec![Vec::new(); columns.len()];
        for record in csv.records() {
            let record = record?;
            for (column, cell) in data.iter_mut().zip(record.iter()) {
                column.push(cell.parse::<f64>().unwrap_or(f64::NAN));
            }
        }

        Ok(Self::new(columns, data))
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|idx| self.data[idx].as_slice())
    }

    /// Values of the named column, or [`ReportError::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.data.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}
