//! Sample selection by factor value and data file collection
//!
//! Selection scans every study and assay sheet in sheet order, row order.
//! A sample qualifies when any one `(factor, value)` pair of the selection
//! matches one of its rows: pairs are combined with OR, not AND.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;

use crate::core::columns::SAMPLE_NAME;
use crate::core::error::{IsaError, MalformedReason};
use crate::core::table::Row;
use crate::entities::assay::files_for_sample;
use crate::entities::{DataFile, Investigation, Value};
use crate::engine::factors::factor_columns;

/// Factor name to expected value, in the order the caller gave them
///
/// Pairs are scanned in this order, so it decides the order of selected
/// samples. Inserting a factor again replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorSelection(IndexMap<String, String>);

/// Errors while reading a factor selection
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid JSON query: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("the query must be a JSON object mapping factor names to values")]
    NotAnObject,

    #[error("unsupported value for factor '{0}': expected a string, number or boolean")]
    UnsupportedValue(String),

    #[error("Galaxy parameters have no 'factor_value_series' list")]
    MissingSeries,
}

impl FactorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, factor: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(factor, value);
        self
    }

    pub fn insert(&mut self, factor: impl Into<String>, value: impl Into<String>) {
        self.0.insert(factor.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a query such as `{"Gender": "Male", "Time": 5}`
    pub fn from_json(query: &str) -> Result<Self, QueryError> {
        let value: serde_json::Value = serde_json::from_str(query)?;
        let object = value.as_object().ok_or(QueryError::NotAnObject)?;

        let mut selection = Self::new();
        for (factor, expected) in object {
            selection.insert(factor.clone(), scalar_text(factor, expected)?);
        }
        Ok(selection)
    }

    /// Parse Galaxy tool parameters:
    /// `{"factor_value_series": [{"factor_name": .., "factor_value": ..}]}`
    pub fn from_galaxy_parameters(json: &str) -> Result<Self, QueryError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let series = value
            .get("factor_value_series")
            .and_then(serde_json::Value::as_array)
            .ok_or(QueryError::MissingSeries)?;

        let mut selection = Self::new();
        for item in series {
            let factor = item
                .get("factor_name")
                .and_then(serde_json::Value::as_str)
                .ok_or(QueryError::MissingSeries)?;
            let expected = item
                .get("factor_value")
                .ok_or_else(|| QueryError::UnsupportedValue(factor.to_string()))?;
            selection.insert(factor, scalar_text(factor, expected)?);
        }
        Ok(selection)
    }
}

fn scalar_text(factor: &str, value: &serde_json::Value) -> Result<String, QueryError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(QueryError::UnsupportedValue(factor.to_string())),
    }
}

/// One selected sample and its data files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceEntry {
    pub sample: String,
    pub data_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_used: Option<FactorSelection>,
}

/// Select samples, optionally by factor value, and collect their data files
///
/// Results are in first-seen sample order; each sample's files are in
/// assay sheet order, then row order. An empty result is not an error.
pub fn slice(
    document: &Investigation,
    selection: Option<&FactorSelection>,
) -> Result<Vec<SliceEntry>, IsaError> {
    let samples = select_samples(document, selection)?;
    let assay_sheets = document.assay_sheets();

    Ok(samples
        .into_iter()
        .map(|sample| {
            let mut data_files: Vec<String> = Vec::new();
            for table in &assay_sheets {
                for file in files_for_sample(table, &sample) {
                    if !data_files.contains(&file) {
                        data_files.push(file);
                    }
                }
            }
            SliceEntry {
                sample,
                data_files,
                query_used: selection.cloned(),
            }
        })
        .collect())
}

/// First pass of [`slice`]: the names of the selected samples
pub fn select_samples(
    document: &Investigation,
    selection: Option<&FactorSelection>,
) -> Result<Vec<String>, IsaError> {
    let sheets = document.sheets();
    if sheets.is_empty() {
        return Err(IsaError::malformed(MalformedReason::NoSheets));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut selected: Vec<String> = Vec::new();
    let mut select = |name: &str| {
        if seen.insert(name.to_string()) {
            selected.push(name.to_string());
        }
    };

    for table in sheets {
        let Some(sample_idx) = table.column_index(SAMPLE_NAME) else {
            continue;
        };
        let sample_of = |row: &Row| {
            row.cell(sample_idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match selection {
            None => {
                for name in table.rows().filter_map(sample_of) {
                    select(&name);
                }
            }
            Some(selection) => {
                for (factor, expected) in selection.iter() {
                    for idx in factor_columns(table, factor) {
                        for row in table.rows() {
                            let matches = Value::read(table, row, idx)
                                .is_some_and(|(value, _)| value.display() == expected);
                            if let (true, Some(name)) = (matches, sample_of(row)) {
                                select(&name);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(selected)
}

/// Names of the sources every sample called `sample_name` derives from
pub fn sources_for_sample(document: &Investigation, sample_name: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for (_, sample) in document.samples().filter(|(_, s)| s.name == sample_name) {
        for source in &sample.derives_from {
            if !sources.contains(source) {
                sources.push(source.clone());
            }
        }
    }
    sources
}

/// Data files whose "generated from" set names the sample
pub fn data_for_sample<'a>(document: &'a Investigation, sample_name: &str) -> Vec<&'a DataFile> {
    document
        .assays()
        .flat_map(|assay| assay.data_files.iter())
        .filter(|data| data.generated_from.iter().any(|s| s == sample_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Table;
    use crate::entities::investigation::fixtures::{investigation_table, treatment_document};

    fn entry(sample: &str, files: &[&str]) -> (String, Vec<String>) {
        (sample.to_string(), files.iter().map(|f| f.to_string()).collect())
    }

    fn pairs(result: &[SliceEntry]) -> Vec<(String, Vec<String>)> {
        result
            .iter()
            .map(|e| (e.sample.clone(), e.data_files.clone()))
            .collect()
    }

    #[test]
    fn test_slice_by_treatment() {
        let doc = treatment_document();
        let selection = FactorSelection::new().with("Treatment", "drug");
        let result = slice(&doc, Some(&selection)).unwrap();

        assert_eq!(
            pairs(&result),
            vec![entry("S1", &["d1.raw"]), entry("S2", &["d2.raw"])]
        );
        assert!(result.iter().all(|e| e.query_used.as_ref() == Some(&selection)));
    }

    #[test]
    fn test_slice_without_selection_returns_every_sample_once() {
        let doc = treatment_document();
        let result = slice(&doc, None).unwrap();
        assert_eq!(
            pairs(&result),
            vec![
                entry("S1", &["d1.raw"]),
                entry("S2", &["d2.raw"]),
                entry("S3", &["d3.raw"]),
            ]
        );
        assert!(result.iter().all(|e| e.query_used.is_none()));
    }

    #[test]
    fn test_slice_undeclared_factor_is_empty() {
        let doc = treatment_document();
        let selection = FactorSelection::new().with("Gender", "Male");
        assert!(slice(&doc, Some(&selection)).unwrap().is_empty());
    }

    #[test]
    fn test_slice_pairs_combine_with_or() {
        let study = Table::from_rows(
            "s_study.txt",
            &["Sample Name", "Factor Value[Gender]", "Factor Value[Dose]"],
            &[
                vec![Some("S1"), Some("Male"), Some("10")],
                vec![Some("S2"), Some("Female"), Some("20")],
                vec![Some("S3"), Some("Female"), Some("10")],
            ],
        );
        let doc = Investigation::build(
            &investigation_table(&[("s_study.txt", vec![])]),
            vec![study],
            vec![],
        )
        .unwrap();

        let selection = FactorSelection::new()
            .with("Gender", "Male")
            .with("Dose", "20");
        let samples: Vec<String> = slice(&doc, Some(&selection))
            .unwrap()
            .into_iter()
            .map(|e| e.sample)
            .collect();
        // Pairs are scanned in query order: Gender selects S1, then Dose selects S2
        assert_eq!(samples, vec!["S1", "S2"]);

        let reversed = FactorSelection::new()
            .with("Dose", "20")
            .with("Gender", "Male");
        let samples: Vec<String> = slice(&doc, Some(&reversed))
            .unwrap()
            .into_iter()
            .map(|e| e.sample)
            .collect();
        assert_eq!(samples, vec!["S2", "S1"]);
        assert!(slice(&doc, Some(&selection)).unwrap().iter().all(|e| e.data_files.is_empty()));
    }

    #[test]
    fn test_data_files_union_across_assays_and_columns() {
        let study = Table::from_rows(
            "s_study.txt",
            &["Sample Name", "Factor Value[Treatment]"],
            &[vec![Some("S1"), Some("drug")], vec![Some("S2"), Some("drug")]],
        );
        let nmr = Table::from_rows(
            "a_nmr.txt",
            &["Sample Name", "Free Induction Decay Data File", "Derived Spectral Data File"],
            &[
                vec![Some("S1"), Some("s1.fid"), Some("s1.spec")],
                vec![Some("S2"), None, Some("s2.spec")],
            ],
        );
        let ms = Table::from_rows(
            "a_ms.txt",
            &["Sample Name", "Raw Spectral Data File", "Metabolite Assignment File"],
            &[
                vec![Some("S1"), Some("s1.raw"), Some("maf.tsv")],
                vec![Some("S1"), Some("s1.raw"), Some("maf.tsv")],
                vec![Some("S2"), Some("s2.raw"), Some("maf.tsv")],
            ],
        );
        let doc = Investigation::build(
            &investigation_table(&[("s_study.txt", vec!["a_nmr.txt", "a_ms.txt"])]),
            vec![study],
            vec![ms, nmr],
        )
        .unwrap();

        let result = slice(&doc, Some(&FactorSelection::new().with("Treatment", "drug"))).unwrap();
        assert_eq!(
            pairs(&result),
            vec![
                entry("S1", &["s1.spec", "s1.fid", "s1.raw", "maf.tsv"]),
                entry("S2", &["s2.spec", "s2.raw", "maf.tsv"]),
            ]
        );
    }

    #[test]
    fn test_slice_selection_matches_term_labels() {
        let study = Table::from_rows(
            "s_study.txt",
            &["Sample Name", "Factor Value[Gender]", "Term Source REF", "Term Accession Number"],
            &[
                vec![Some("S1"), Some("Male"), Some("EFO"), Some("EFO_0001266")],
                vec![Some("S2"), Some("Female"), Some("EFO"), Some("EFO_0001265")],
            ],
        );
        let doc = Investigation::build(
            &investigation_table(&[("s_study.txt", vec![])]),
            vec![study],
            vec![],
        )
        .unwrap();
        let result = slice(&doc, Some(&FactorSelection::new().with("Gender", "Female"))).unwrap();
        assert_eq!(pairs(&result), vec![entry("S2", &[])]);
    }

    #[test]
    fn test_selection_from_json() {
        let selection = FactorSelection::from_json(r#"{"Gender": "Male", "Time": 5, "Fasted": true}"#).unwrap();
        let pairs: Vec<(&str, &str)> = selection.iter().collect();
        assert_eq!(pairs, vec![("Gender", "Male"), ("Time", "5"), ("Fasted", "true")]);

        assert!(matches!(FactorSelection::from_json("[1, 2]"), Err(QueryError::NotAnObject)));
        assert!(matches!(
            FactorSelection::from_json(r#"{"Gender": null}"#),
            Err(QueryError::UnsupportedValue(_))
        ));
        assert!(matches!(FactorSelection::from_json("{"), Err(QueryError::InvalidJson(_))));
    }

    #[test]
    fn test_selection_from_galaxy_parameters() {
        let json = r#"{"factor_value_series": [
            {"factor_name": "Gender", "factor_value": "Male"},
            {"factor_name": "Dose", "factor_value": 10}
        ]}"#;
        let selection = FactorSelection::from_galaxy_parameters(json).unwrap();
        let pairs: Vec<(&str, &str)> = selection.iter().collect();
        assert_eq!(pairs, vec![("Gender", "Male"), ("Dose", "10")]);

        assert!(matches!(
            FactorSelection::from_galaxy_parameters("{}"),
            Err(QueryError::MissingSeries)
        ));
    }

    #[test]
    fn test_galaxy_series_order_decides_sample_order() {
        let study = Table::from_rows(
            "s_study.txt",
            &["Sample Name", "Factor Value[Gender]", "Factor Value[Dose]"],
            &[
                vec![Some("S1"), Some("Male"), Some("10")],
                vec![Some("S2"), Some("Female"), Some("20")],
            ],
        );
        let doc = Investigation::build(
            &investigation_table(&[("s_study.txt", vec![])]),
            vec![study],
            vec![],
        )
        .unwrap();

        let json = r#"{"factor_value_series": [
            {"factor_name": "Gender", "factor_value": "Male"},
            {"factor_name": "Dose", "factor_value": 20}
        ]}"#;
        let selection = FactorSelection::from_galaxy_parameters(json).unwrap();
        let result = slice(&doc, Some(&selection)).unwrap();

        let samples: Vec<&str> = result.iter().map(|e| e.sample.as_str()).collect();
        assert_eq!(samples, vec!["S1", "S2"]);
        assert_eq!(
            serde_json::to_string(&result[0].query_used).unwrap(),
            r#"{"Gender":"Male","Dose":"20"}"#
        );
    }

    #[test]
    fn test_selection_repeated_factor_replaces_in_place() {
        let selection = FactorSelection::new()
            .with("Gender", "Male")
            .with("Dose", "10")
            .with("Gender", "Female");
        let pairs: Vec<(&str, &str)> = selection.iter().collect();
        assert_eq!(pairs, vec![("Gender", "Female"), ("Dose", "10")]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_slice_without_selection_includes_assay_only_samples() {
        let study = Table::from_rows(
            "s_study.txt",
            &["Sample Name", "Factor Value[Treatment]"],
            &[vec![Some("S1"), Some("drug")]],
        );
        let assay = Table::from_rows(
            "a_ms.txt",
            &["Sample Name", "Raw Spectral Data File"],
            &[vec![Some("S1"), Some("d1.raw")], vec![Some("S2"), Some("d2.raw")]],
        );
        let doc = Investigation::build(
            &investigation_table(&[("s_study.txt", vec!["a_ms.txt"])]),
            vec![study],
            vec![assay],
        )
        .unwrap();

        assert_eq!(
            pairs(&slice(&doc, None).unwrap()),
            vec![entry("S1", &["d1.raw"]), entry("S2", &["d2.raw"])]
        );
    }

    #[test]
    fn test_slice_entry_json_shape() {
        let entry = SliceEntry {
            sample: "S1".into(),
            data_files: vec!["d1.raw".into()],
            query_used: None,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"sample":"S1","data_files":["d1.raw"]}"#
        );

        let with_query = SliceEntry {
            query_used: Some(FactorSelection::new().with("Treatment", "drug")),
            ..entry
        };
        assert_eq!(
            serde_json::to_string(&with_query).unwrap(),
            r#"{"sample":"S1","data_files":["d1.raw"],"query_used":{"Treatment":"drug"}}"#
        );
    }

    #[test]
    fn test_sources_and_data_for_sample() {
        let doc = treatment_document();
        assert_eq!(sources_for_sample(&doc, "S2"), vec!["src2"]);
        assert!(sources_for_sample(&doc, "S9").is_empty());

        let files: Vec<&str> = data_for_sample(&doc, "S3")
            .into_iter()
            .map(|d| d.filename.as_str())
            .collect();
        assert_eq!(files, vec!["d3.raw"]);
    }
}
