//! Cell values, factor values and characteristics

use serde::{Deserialize, Serialize};

use crate::core::columns::{TERM_ACCESSION_NUMBER, TERM_SOURCE_REF, UNIT};
use crate::core::table::{Row, Table};

/// A reference into an ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
}

/// A factor value or characteristic value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Term(OntologyTerm),
}

impl Value {
    /// Reduce to the text used for comparison and output
    pub fn display(&self) -> &str {
        match self {
            Value::Scalar(s) => s,
            Value::Term(t) => &t.label,
        }
    }

    /// Read the value of column `index` in `row`, looking at the qualifier
    /// columns that follow it. Returns `None` for a missing cell.
    pub fn read(table: &Table, row: &Row, index: usize) -> Option<(Value, Option<OntologyTerm>)> {
        let text = row.cell(index)?.to_string();

        match table.column(index + 1) {
            Some(UNIT) => {
                let unit = row.cell(index + 1).map(|label| OntologyTerm {
                    label: label.to_string(),
                    source: qualifier(table, row, index + 2, TERM_SOURCE_REF),
                    accession: qualifier(table, row, index + 3, TERM_ACCESSION_NUMBER),
                });
                Some((Value::Scalar(text), unit))
            }
            Some(TERM_SOURCE_REF) => {
                let source = qualifier(table, row, index + 1, TERM_SOURCE_REF);
                let accession = qualifier(table, row, index + 2, TERM_ACCESSION_NUMBER);
                if source.is_none() && accession.is_none() {
                    Some((Value::Scalar(text), None))
                } else {
                    Some((
                        Value::Term(OntologyTerm {
                            label: text,
                            source,
                            accession,
                        }),
                        None,
                    ))
                }
            }
            _ => Some((Value::Scalar(text), None)),
        }
    }
}

fn qualifier(table: &Table, row: &Row, index: usize, header: &str) -> Option<String> {
    if table.column(index) != Some(header) {
        return None;
    }
    row.cell(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An experimental factor's value on a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorValue {
    pub factor_name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<OntologyTerm>,
}

/// A descriptive attribute of a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub category: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<OntologyTerm>,
}
