//! In-memory sheet abstraction
//!
//! A [`Table`] is one loaded ISA-Tab sheet: ordered column headers and
//! ordered rows of string cells. Column headers are not unique in ISA-Tab
//! (`Term Source REF`, `Protocol REF` and friends repeat), so rows keep one
//! cell per column position and name lookups resolve to the first match.
//!
//! Missing cells are `None`, which is distinct from an explicitly empty
//! string.

/// One row of a [`Table`], aligned with the table's columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<Option<String>>,
}

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Cell at a column position (`None` when missing or out of range)
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// Number of cells in the row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A loaded sheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Build a table from string literals; empty strings stay empty (not missing)
    ///
    /// Use [`Table::new`] with `None` cells to express missing values.
    pub fn from_rows<S: AsRef<str>>(name: &str, columns: &[S], rows: &[Vec<Option<&str>>]) -> Self {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|r| Row::new(r.iter().map(|c| c.map(str::to_string)).collect()))
            .collect();
        Self::new(name, columns, rows)
    }

    /// Sheet name (the file name it was loaded from)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterate rows in file order; the iterator can be recreated at will
    pub fn rows(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of the first column with this exact header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Positions of every column with this exact header
    pub fn column_indices(&self, name: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Header at a column position
    pub fn column(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Value of a named column in a row, `None` when the column is absent or the cell missing
    pub fn get<'a>(&self, row: &'a Row, column: &str) -> Option<&'a str> {
        self.column_index(column).and_then(|i| row.cell(i))
    }
}
