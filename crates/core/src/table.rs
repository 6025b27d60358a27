#![forbid(unsafe_code)]

use std::collections::BTreeMap;

/// A single scalar value as stored in a table.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// Store-safe form: non-finite floats and empty text collapse to `Empty`.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Float(v) if !v.is_finite() => Self::Empty,
            Self::Text(v) if v.is_empty() => Self::Empty,
            other => other.clone(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(v) => v.clone(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) if v.is_finite() => v.to_string(),
            Self::Float(_) => String::new(),
        }
    }

    /// Text form with surrounding whitespace removed; used for natural-key comparison.
    pub fn trimmed_text(&self) -> String {
        self.as_text().trim().to_string()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One table row keyed by column name. Absent columns read as `Cell::Empty`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Cell>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn text(&self, column: &str) -> String {
        self.get(column).as_text()
    }

    pub fn set(&mut self, column: &str, value: impl Into<Cell>) {
        self.cells.insert(column.to_string(), value.into());
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

/// In-memory copy of a whole table obtained from one read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl Snapshot {
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Builds rows from header-aligned cells. Short rows are padded with `Empty`;
    /// cells past the header width have no column name and are dropped.
    pub fn from_grid(header: Vec<String>, grid: Vec<Vec<Cell>>) -> Self {
        let rows = grid
            .into_iter()
            .map(|cells| {
                let mut row = Row::new();
                for (index, column) in header.iter().enumerate() {
                    let cell = cells.get(index).cloned().unwrap_or(Cell::Empty);
                    row.set(column, cell);
                }
                row
            })
            .collect();
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.header.iter().any(|c| c == column)
    }

    /// Appends `column` to the header if missing. Existing column order is never changed.
    pub fn ensure_column(&mut self, column: &str) -> bool {
        if self.has_column(column) {
            return false;
        }
        self.header.push(column.to_string());
        true
    }

    /// Synthesizes every expected column the table lacks; returns the added names.
    pub fn heal(&mut self, columns: &[&str]) -> Vec<String> {
        let mut added = Vec::new();
        for column in columns {
            if self.ensure_column(column) {
                added.push((*column).to_string());
            }
        }
        added
    }

    pub fn replace_row(&mut self, index: usize, row: Row) -> bool {
        for column in row.columns() {
            if !self.header.iter().any(|c| c == column) {
                self.header.push(column.to_string());
            }
        }
        match self.rows.get_mut(index) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    /// Header-aligned, store-safe cells for every row.
    pub fn to_grid(&self) -> Vec<Vec<Cell>> {
        self.rows.iter().map(|row| self.row_cells(row)).collect()
    }

    pub fn row_cells(&self, row: &Row) -> Vec<Cell> {
        self.header
            .iter()
            .map(|column| row.get(column).normalized())
            .collect()
    }
}
