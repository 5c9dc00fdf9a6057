//! Sheet loading from an unpacked ISA-Tab directory
//!
//! Study and assay sheets are tab-separated with a header row. The
//! investigation file has no header: every line is a label followed by
//! values, so it is read into a table with positional column names.

use csv::{ReaderBuilder, StringRecord};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::error::{IsaError, MalformedReason};
use crate::core::sheet::InvestigationSheet;
use crate::core::table::{Row, Table};
use crate::entities::Investigation;

/// Errors while reading sheets from disk
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(isaslice::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    #[diagnostic(
        code(isaslice::load::csv),
        help("ISA-Tab sheets must be tab-separated text files")
    )]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] IsaError),
}

impl LoadError {
    /// True when the investigation was read but declares no study
    pub fn is_empty_document(&self) -> bool {
        matches!(self, LoadError::Document(e) if e.is_empty_document())
    }
}

/// Options applied to every sheet read
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Cell contents read as missing besides the empty string
    pub missing_values: Vec<String>,
}

impl LoadOptions {
    fn is_missing(&self, cell: &str) -> bool {
        cell.is_empty() || self.missing_values.iter().any(|m| m == cell)
    }

    /// Trimmed cells of a record, `None` where missing
    fn cells(&self, record: &StringRecord) -> Vec<Option<String>> {
        record
            .iter()
            .map(str::trim)
            .map(|cell| (!self.is_missing(cell)).then(|| cell.to_string()))
            .collect()
    }
}

fn sheet_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<std::fs::File>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(has_headers);
    if !has_headers {
        builder.comment(Some(b'#'));
    }
    Ok(builder.from_reader(file))
}

/// Read a study, assay or any other tab-separated sheet with a header row
///
/// The table is named after the file name. Empty cells and cells matching
/// one of `options.missing_values` are missing.
pub fn read_table(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = open_reader(path, true)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(Row::new(options.cells(&record)));
    }

    tracing::debug!(
        sheet = %sheet_name(path),
        columns = columns.len(),
        rows = rows.len(),
        "read sheet"
    );
    Ok(Table::new(sheet_name(path), columns, rows))
}

/// Read an investigation file into a label/value table
///
/// Columns are named by position (`"0"`, `"1"`, ...) and sized to the
/// longest line. Lines starting with `#` are comments.
pub fn read_investigation(path: &Path) -> Result<Table, LoadError> {
    let mut reader = open_reader(path, false)?;
    let options = LoadOptions::default();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cells = options.cells(&record);
        if let Some(Some(label)) = cells.first_mut() {
            *label = label.trim_start_matches('\u{feff}').to_string();
        }
        rows.push(Row::new(cells));
    }

    let width = rows.iter().map(Row::len).max().unwrap_or(0);
    let columns = (0..width).map(|i| i.to_string()).collect();

    tracing::debug!(sheet = %sheet_name(path), lines = rows.len(), "read investigation");
    Ok(Table::new(sheet_name(path), columns, rows))
}

/// Locate the investigation file (`i_*.txt`) directly inside `dir`
///
/// When several exist, the first in file name order is used.
pub fn find_investigation(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("i_") && n.ends_with(".txt"))
        })
}

/// Load and build the document held by an unpacked ISA-Tab directory
///
/// Referenced sheets missing from the directory surface as
/// `MalformedDocument` with reason `MissingSheet`.
pub fn load_bundle(dir: &Path, options: &LoadOptions) -> Result<Investigation, LoadError> {
    let investigation_path = find_investigation(dir).ok_or_else(|| {
        IsaError::malformed(MalformedReason::MissingInvestigation(
            dir.display().to_string(),
        ))
    })?;
    tracing::info!(path = %investigation_path.display(), "loading investigation");

    let investigation = read_investigation(&investigation_path)?;
    let sheet = InvestigationSheet::parse(&investigation);

    let mut study_tables = Vec::new();
    let mut assay_tables: Vec<Table> = Vec::new();
    for study in &sheet.studies {
        if let Some(table) = read_referenced(dir, &study.filename, options)? {
            study_tables.push(table);
        }
        for assay in &study.assay_filenames {
            if assay_tables.iter().any(|t| t.name() == assay) {
                continue;
            }
            if let Some(table) = read_referenced(dir, assay, options)? {
                assay_tables.push(table);
            }
        }
    }

    let document = Investigation::build(&investigation, study_tables, assay_tables)?;
    tracing::info!(
        studies = document.studies.len(),
        assays = document.assays().count(),
        "document built"
    );
    Ok(document)
}

fn read_referenced(dir: &Path, name: &str, options: &LoadOptions) -> Result<Option<Table>, LoadError> {
    let path = dir.join(name);
    if !path.is_file() {
        tracing::warn!(sheet = %name, "referenced sheet not found");
        return Ok(None);
    }
    read_table(&path, options).map(Some)
}
