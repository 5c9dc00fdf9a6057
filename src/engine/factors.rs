//! Factor discovery across study and assay sheets

use std::collections::BTreeSet;

use crate::core::columns;
use crate::core::error::IsaError;
use crate::core::table::Table;
use crate::entities::{Investigation, Value};

/// Distinct factor names declared by `Factor Value[..]` columns in any
/// study or assay sheet
pub fn factors(document: &Investigation) -> BTreeSet<String> {
    document
        .sheets()
        .into_iter()
        .flat_map(|table| table.columns().iter())
        .filter_map(|header| columns::factor_name(header))
        .map(str::to_string)
        .collect()
}

/// Distinct non-missing values of a factor across all sheets
///
/// Ontology terms contribute their label. An undeclared factor yields an
/// empty set.
pub fn factor_values(document: &Investigation, factor_name: &str) -> BTreeSet<String> {
    let mut values = BTreeSet::new();
    for table in document.sheets() {
        for idx in factor_columns(table, factor_name) {
            for row in table.rows() {
                if let Some((value, _)) = Value::read(table, row, idx) {
                    values.insert(value.display().to_string());
                }
            }
        }
    }
    values
}

/// Like [`factor_values`], but an undeclared factor is an error
///
/// A factor counts as declared when a sheet has a column for it or the
/// investigation sheet names it as a study factor.
pub fn require_factor(document: &Investigation, factor_name: &str) -> Result<BTreeSet<String>, IsaError> {
    let declared_by_study = document
        .studies
        .iter()
        .any(|study| study.declared_factors.iter().any(|f| f == factor_name));
    if !declared_by_study && !factors(document).contains(factor_name) {
        return Err(IsaError::UnknownFactor(factor_name.to_string()));
    }
    Ok(factor_values(document, factor_name))
}

/// Distinct combinations of factor values found on sheet rows
///
/// Each combination lists the row's non-missing `(factor, value)` pairs in
/// column order. Sheets are scanned in order and rows without any factor
/// value are skipped.
pub fn factor_combinations(document: &Investigation) -> Vec<Vec<(String, String)>> {
    let mut combinations: Vec<Vec<(String, String)>> = Vec::new();

    for table in document.sheets() {
        let factor_cols: Vec<(usize, &str)> = table
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(i, h)| columns::factor_name(h).map(|name| (i, name)))
            .collect();
        if factor_cols.is_empty() {
            continue;
        }

        for row in table.rows() {
            let combination: Vec<(String, String)> = factor_cols
                .iter()
                .filter_map(|&(idx, name)| {
                    Value::read(table, row, idx)
                        .map(|(value, _)| (name.to_string(), value.display().to_string()))
                })
                .collect();
            if !combination.is_empty() && !combinations.contains(&combination) {
                combinations.push(combination);
            }
        }
    }

    combinations
}

/// Positions of the columns holding a factor in one sheet
pub(crate) fn factor_columns(table: &Table, factor_name: &str) -> Vec<usize> {
    table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, h)| columns::factor_name(h) == Some(factor_name))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::investigation::fixtures::{investigation_table, treatment_document};

    fn two_factor_document() -> Investigation {
        let study = Table::from_rows(
            "s_study.txt",
            &[
                "Sample Name",
                "Factor Value[ Gender ]",
                "Term Source REF",
                "Term Accession Number",
                "Factor Value[Time]",
                "Unit",
            ],
            &[
                vec![Some("S1"), Some("Male"), Some("EFO"), Some("EFO_0001266"), Some("1"), Some("hour")],
                vec![Some("S2"), Some("Female"), Some("EFO"), None, Some("1"), Some("hour")],
                vec![Some("S3"), None, None, None, Some("2"), Some("hour")],
            ],
        );
        let assay = Table::from_rows(
            "a_ms.txt",
            &["Sample Name", "Factor Value[Dose]", "Raw Data File"],
            &[
                vec![Some("S1"), Some("10"), Some("d1.raw")],
                vec![Some("S2"), None, Some("d2.raw")],
            ],
        );
        Investigation::build(
            &investigation_table(&[("s_study.txt", vec!["a_ms.txt"])]),
            vec![study],
            vec![assay],
        )
        .unwrap()
    }

    #[test]
    fn test_factors_across_sheets() {
        let doc = two_factor_document();
        let names: Vec<String> = factors(&doc).into_iter().collect();
        assert_eq!(names, vec!["Dose", "Gender", "Time"]);
    }

    #[test]
    fn test_factor_values_skip_missing() {
        let doc = two_factor_document();
        let genders: Vec<String> = factor_values(&doc, "Gender").into_iter().collect();
        assert_eq!(genders, vec!["Female", "Male"]);

        let times: Vec<String> = factor_values(&doc, "Time").into_iter().collect();
        assert_eq!(times, vec!["1", "2"]);

        let doses: Vec<String> = factor_values(&doc, "Dose").into_iter().collect();
        assert_eq!(doses, vec!["10"]);
    }

    #[test]
    fn test_undeclared_factor() {
        let doc = treatment_document();
        assert!(factor_values(&doc, "Gender").is_empty());
        assert!(matches!(
            require_factor(&doc, "Gender"),
            Err(IsaError::UnknownFactor(ref f)) if f == "Gender"
        ));
        assert_eq!(require_factor(&doc, "Treatment").unwrap().len(), 2);
    }

    #[test]
    fn test_factor_declared_without_columns() {
        let inv = Table::from_rows(
            "i_Investigation.txt",
            &["0", "1", "2"],
            &[
                vec![Some("Investigation Identifier"), Some("INV1"), None],
                vec![Some("STUDY"), None, None],
                vec![Some("Study Identifier"), Some("ST1"), None],
                vec![Some("Study File Name"), Some("s_study.txt"), None],
                vec![Some("Study Factor Name"), Some("Treatment"), Some("Time")],
            ],
        );
        let study = Table::from_rows(
            "s_study.txt",
            &["Sample Name", "Factor Value[Treatment]"],
            &[vec![Some("S1"), Some("drug")]],
        );
        let doc = Investigation::build(&inv, vec![study], vec![]).unwrap();

        assert!(require_factor(&doc, "Time").unwrap().is_empty());
        assert!(require_factor(&doc, "Dose").is_err());
        assert!(!factors(&doc).contains("Time"));
    }

    #[test]
    fn test_factor_combinations() {
        let doc = treatment_document();
        let combos = factor_combinations(&doc);
        assert_eq!(
            combos,
            vec![
                vec![("Treatment".to_string(), "drug".to_string())],
                vec![("Treatment".to_string(), "control".to_string())],
            ]
        );
    }
}
