//! Assay sheets and the data files they list

use serde::Serialize;

use crate::core::columns::{DataNode, SAMPLE_NAME};
use crate::core::error::{IsaError, MalformedReason};
use crate::core::table::Table;

/// A file produced while processing one or more samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFile {
    pub filename: String,
    /// Column the file was first found under
    pub label: DataNode,
    /// Samples whose rows list this file, in row order
    pub generated_from: Vec<String>,
}

/// An assay sheet belonging to a study
#[derive(Debug, Clone)]
pub struct Assay {
    pub filename: String,
    /// File name of the owning study (lookup key, not ownership)
    pub study_filename: String,
    pub data_files: Vec<DataFile>,
    table: Table,
}

impl Assay {
    pub(crate) fn from_table(table: Table, study_filename: &str) -> Result<Self, IsaError> {
        let sample_idx = table.column_index(SAMPLE_NAME).ok_or_else(|| {
            IsaError::malformed(MalformedReason::MissingColumn {
                sheet: table.name().to_string(),
                column: SAMPLE_NAME.to_string(),
            })
        })?;

        let node_columns = data_node_columns(&table);
        let mut data_files: Vec<DataFile> = Vec::new();
        for row in table.rows() {
            let sample = row
                .cell(sample_idx)
                .map(str::trim)
                .filter(|s| !s.is_empty());
            for &(node, idx) in &node_columns {
                let Some(filename) = row.cell(idx) else {
                    continue;
                };
                let pos = match data_files.iter().position(|d| d.filename == filename) {
                    Some(pos) => pos,
                    None => {
                        data_files.push(DataFile {
                            filename: filename.to_string(),
                            label: node,
                            generated_from: Vec::new(),
                        });
                        data_files.len() - 1
                    }
                };
                if let Some(sample) = sample {
                    let generated_from = &mut data_files[pos].generated_from;
                    if !generated_from.iter().any(|s| s == sample) {
                        generated_from.push(sample.to_string());
                    }
                }
            }
        }

        Ok(Self {
            filename: table.name().to_string(),
            study_filename: study_filename.to_string(),
            data_files,
            table,
        })
    }

    /// The underlying sheet
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Data files listed on the rows of `sample_name`, recomputed from the sheet
    ///
    /// Row order first, then data-node order within a row; each file once.
    pub fn files_for_sample(&self, sample_name: &str) -> Vec<String> {
        files_for_sample(&self.table, sample_name)
    }

    /// The one data file of a sample in this assay
    ///
    /// `Ok(None)` when the sample lists no file here, `AmbiguousDataFile`
    /// when it lists several.
    pub fn single_data_file(&self, sample_name: &str) -> Result<Option<String>, IsaError> {
        let mut files = self.files_for_sample(sample_name);
        match files.len() {
            0 => Ok(None),
            1 => Ok(files.pop()),
            _ => Err(IsaError::AmbiguousDataFile {
                sample: sample_name.to_string(),
                assay: self.filename.clone(),
                files,
            }),
        }
    }
}

/// Data-node columns of a sheet as `(node, position)`, in closed-set order
///
/// Repeated columns of one node keep their sheet order.
pub fn data_node_columns(table: &Table) -> Vec<(DataNode, usize)> {
    let mut found: Vec<(DataNode, usize)> = table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| DataNode::from_label(header).map(|node| (node, idx)))
        .collect();
    found.sort_by_key(|&(node, _)| node);
    found
}

/// Row-matching data file lookup on any sheet
pub fn files_for_sample(table: &Table, sample_name: &str) -> Vec<String> {
    let Some(sample_idx) = table.column_index(SAMPLE_NAME) else {
        return Vec::new();
    };
    let node_columns = data_node_columns(table);
    let mut files: Vec<String> = Vec::new();

    for row in table
        .rows()
        .filter(|r| r.cell(sample_idx).map(str::trim) == Some(sample_name))
    {
        for &(_, idx) in &node_columns {
            if let Some(filename) = row.cell(idx) {
                if !files.iter().any(|f| f == filename) {
                    files.push(filename.to_string());
                }
            }
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assay_table() -> Table {
        Table::from_rows(
            "a_ms.txt",
            &[
                "Sample Name",
                "Factor Value[Dose]",
                "Raw Spectral Data File",
                "Derived Spectral Data File",
                "Metabolite Assignment File",
            ],
            &[
                vec![Some("S1"), Some("10"), Some("s1.raw"), Some("s1.mzML"), Some("m.tsv")],
                vec![Some("S2"), Some("20"), Some("s2.raw"), None, Some("m.tsv")],
                vec![Some("S1"), Some("10"), Some("s1b.raw"), None, None],
            ],
        )
    }

    #[test]
    fn test_data_files_accumulate_samples() {
        let assay = Assay::from_table(assay_table(), "s_study.txt").unwrap();
        let names: Vec<&str> = assay.data_files.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["s1.raw", "s1.mzML", "m.tsv", "s2.raw", "s1b.raw"]);

        let maf = assay.data_files.iter().find(|d| d.filename == "m.tsv").unwrap();
        assert_eq!(maf.label, DataNode::MetaboliteAssignmentFile);
        assert_eq!(maf.generated_from, vec!["S1", "S2"]);
        assert_eq!(assay.study_filename, "s_study.txt");
    }

    #[test]
    fn test_data_node_columns_closed_set_order() {
        let table = Table::from_rows(
            "a_nmr.txt",
            &[
                "Sample Name",
                "Free Induction Decay Data File",
                "Raw Data File",
                "Comment[Raw Data File]",
                "Free Induction Decay Data File",
            ],
            &[],
        );
        assert_eq!(
            data_node_columns(&table),
            vec![
                (DataNode::RawDataFile, 2),
                (DataNode::FreeInductionDecayDataFile, 1),
                (DataNode::FreeInductionDecayDataFile, 4),
            ]
        );
    }

    #[test]
    fn test_files_for_sample_row_order() {
        let assay = Assay::from_table(assay_table(), "s_study.txt").unwrap();
        assert_eq!(
            assay.files_for_sample("S1"),
            vec!["s1.raw", "s1.mzML", "m.tsv", "s1b.raw"]
        );
        assert!(assay.files_for_sample("S9").is_empty());
    }

    #[test]
    fn test_single_data_file() {
        let table = Table::from_rows(
            "a_nmr.txt",
            &["Sample Name", "Free Induction Decay Data File", "Raw Data File"],
            &[
                vec![Some("S1"), Some("s1.fid"), None],
                vec![Some("S2"), Some("s2.fid"), Some("s2.zip")],
            ],
        );
        let assay = Assay::from_table(table, "s_study.txt").unwrap();
        assert_eq!(assay.single_data_file("S1").unwrap(), Some("s1.fid".to_string()));
        assert_eq!(assay.single_data_file("S3").unwrap(), None);

        let err = assay.single_data_file("S2").unwrap_err();
        match err {
            IsaError::AmbiguousDataFile { files, .. } => {
                // Raw Data File precedes FID files in data-node order
                assert_eq!(files, vec!["s2.zip", "s2.fid"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_sample_column_is_malformed() {
        let table = Table::from_rows("a_bad.txt", &["Raw Data File"], &[vec![Some("x.raw")]]);
        let err = Assay::from_table(table, "s_study.txt").unwrap_err();
        assert!(matches!(
            err,
            IsaError::MalformedDocument {
                reason: MalformedReason::MissingColumn { .. }
            }
        ));
    }
}
