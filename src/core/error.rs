//! Error types shared by the document model and the query engine

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Why a document could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The investigation sheet declares no study
    NoStudies,
    /// No study or assay sheet is available to scan
    NoSheets,
    /// A study or assay file referenced by the investigation was not supplied
    MissingSheet(String),
    /// A sheet lacks a column every sheet of its kind must have
    MissingColumn { sheet: String, column: String },
    /// No investigation file was found in the input directory
    MissingInvestigation(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::NoStudies => write!(f, "the investigation declares no study"),
            MalformedReason::NoSheets => write!(f, "no study or assay sheet found"),
            MalformedReason::MissingSheet(name) => {
                write!(f, "referenced sheet '{}' was not supplied", name)
            }
            MalformedReason::MissingColumn { sheet, column } => {
                write!(f, "sheet '{}' has no '{}' column", sheet, column)
            }
            MalformedReason::MissingInvestigation(dir) => {
                write!(f, "no investigation file (i_*.txt) in {}", dir)
            }
        }
    }
}

/// Errors raised while building or querying an ISA-Tab document
#[derive(Debug, Error, Diagnostic)]
pub enum IsaError {
    #[error("malformed document: {reason}")]
    #[diagnostic(
        code(isaslice::document::malformed),
        help("check that the investigation file references study and assay files present in the input directory")
    )]
    MalformedDocument { reason: MalformedReason },

    #[error("factor '{0}' is not declared in any study or assay sheet")]
    #[diagnostic(
        code(isaslice::factor::unknown),
        help("use `isaslice factors` to list the declared factors")
    )]
    UnknownFactor(String),

    #[error("sample '{sample}' has {} data files in assay '{assay}' where one was expected: {}", .files.len(), .files.join(", "))]
    #[diagnostic(code(isaslice::data_file::ambiguous))]
    AmbiguousDataFile {
        sample: String,
        assay: String,
        files: Vec<String>,
    },

    #[error("study '{0}' not found in the investigation")]
    #[diagnostic(
        code(isaslice::study::not_found),
        help("use `isaslice studies` to list the study files")
    )]
    StudyNotFound(String),

    #[error("the investigation contains {0} studies, select one of them")]
    #[diagnostic(
        code(isaslice::study::ambiguous),
        help("pass --study <FILE NAME>")
    )]
    AmbiguousStudy(usize),
}

impl IsaError {
    pub fn malformed(reason: MalformedReason) -> Self {
        IsaError::MalformedDocument { reason }
    }

    /// True for the terminal "no data" condition of an investigation without studies
    pub fn is_empty_document(&self) -> bool {
        matches!(
            self,
            IsaError::MalformedDocument {
                reason: MalformedReason::NoStudies
            }
        )
    }
}
