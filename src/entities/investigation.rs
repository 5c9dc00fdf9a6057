//! Investigation: the root of the document model

use std::collections::{HashMap, HashSet};

use crate::core::error::{IsaError, MalformedReason};
use crate::core::sheet::InvestigationSheet;
use crate::core::table::Table;
use crate::entities::assay::Assay;
use crate::entities::sample::Sample;
use crate::entities::study::Study;

/// A loaded ISA-Tab document
///
/// Entities are built once from the sheets and never modified; reflecting
/// changed files requires building a new document.
#[derive(Debug, Clone)]
pub struct Investigation {
    pub identifier: String,
    pub studies: Vec<Study>,
}

impl Investigation {
    /// Build the document model from the investigation sheet and the study
    /// and assay sheets it references (matched by table name)
    pub fn build(
        investigation: &Table,
        study_tables: Vec<Table>,
        assay_tables: Vec<Table>,
    ) -> Result<Self, IsaError> {
        let sheet = InvestigationSheet::parse(investigation);
        if sheet.studies.is_empty() {
            return Err(IsaError::malformed(MalformedReason::NoStudies));
        }

        let study_tables: HashMap<String, Table> = study_tables
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        let assay_tables: HashMap<String, Table> = assay_tables
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();

        let mut studies = Vec::with_capacity(sheet.studies.len());
        for reference in &sheet.studies {
            let table = study_tables.get(&reference.filename).cloned().ok_or_else(|| {
                IsaError::malformed(MalformedReason::MissingSheet(reference.filename.clone()))
            })?;

            let assays = reference
                .assay_filenames
                .iter()
                .map(|name| {
                    assay_tables.get(name).cloned().ok_or_else(|| {
                        IsaError::malformed(MalformedReason::MissingSheet(name.clone()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            studies.push(Study::build(reference, table, assays)?);
        }

        Ok(Self {
            identifier: sheet.identifier,
            studies,
        })
    }

    /// Study by file name or identifier
    pub fn study(&self, name: &str) -> Option<&Study> {
        self.studies
            .iter()
            .find(|s| s.filename == name)
            .or_else(|| self.studies.iter().find(|s| s.identifier == name))
    }

    /// Pick the study to work on
    ///
    /// With a name the matching study is returned. Without one, the
    /// investigation must hold exactly one study.
    pub fn select_study(&self, name: Option<&str>) -> Result<&Study, IsaError> {
        match name {
            Some(name) => self
                .study(name)
                .ok_or_else(|| IsaError::StudyNotFound(name.to_string())),
            None => match self.studies.as_slice() {
                [only] => Ok(only),
                [] => Err(IsaError::malformed(MalformedReason::NoStudies)),
                many => Err(IsaError::AmbiguousStudy(many.len())),
            },
        }
    }

    /// A copy of this document holding only the named study
    pub fn restrict_to(&self, name: &str) -> Result<Investigation, IsaError> {
        let study = self
            .study(name)
            .ok_or_else(|| IsaError::StudyNotFound(name.to_string()))?;
        Ok(Investigation {
            identifier: self.identifier.clone(),
            studies: vec![study.clone()],
        })
    }

    /// Study and assay sheets in sheet order: each study sheet followed by
    /// its assay sheets, every file at most once
    pub fn sheets(&self) -> Vec<&Table> {
        let mut seen = HashSet::new();
        let mut sheets = Vec::new();
        for study in &self.studies {
            if seen.insert(study.filename.as_str()) {
                sheets.push(study.table());
            }
            for assay in &study.assays {
                if seen.insert(assay.filename.as_str()) {
                    sheets.push(assay.table());
                }
            }
        }
        sheets
    }

    /// Assay sheets in sheet order, every file at most once
    pub fn assay_sheets(&self) -> Vec<&Table> {
        let mut seen = HashSet::new();
        self.assays()
            .filter(|a| seen.insert(a.filename.as_str()))
            .map(Assay::table)
            .collect()
    }

    pub fn assays(&self) -> impl Iterator<Item = &Assay> {
        self.studies.iter().flat_map(|s| s.assays.iter())
    }

    /// Every sample of every study, paired with its study
    pub fn samples(&self) -> impl Iterator<Item = (&Study, &Sample)> {
        self.studies
            .iter()
            .flat_map(|study| study.samples.iter().map(move |sample| (study, sample)))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_build_treatment_document() {
        let doc = treatment_document();
        assert_eq!(doc.identifier, "INV1");
        assert_eq!(doc.studies.len(), 1);
        assert_eq!(doc.studies[0].samples.len(), 3);
        assert_eq!(doc.studies[0].assays[0].data_files.len(), 3);
        let names: Vec<&str> = doc.sheets().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["s_study.txt", "a_ms.txt"]);
    }

    #[test]
    fn test_build_without_studies() {
        let table = Table::from_rows(
            "i_Investigation.txt",
            &["0", "1"],
            &[vec![Some("Investigation Identifier"), Some("INV1")]],
        );
        let err = Investigation::build(&table, vec![], vec![]).unwrap_err();
        assert!(err.is_empty_document());
    }

    #[test]
    fn test_build_with_missing_assay_sheet() {
        let inv = investigation_table(&[("s_study.txt", vec!["a_missing.txt"])]);
        let study = Table::from_rows("s_study.txt", &["Sample Name"], &[vec![Some("S1")]]);
        let err = Investigation::build(&inv, vec![study], vec![]).unwrap_err();
        assert!(matches!(
            err,
            IsaError::MalformedDocument {
                reason: MalformedReason::MissingSheet(ref name)
            } if name == "a_missing.txt"
        ));
    }

    #[test]
    fn test_select_study() {
        let inv = investigation_table(&[("s_one.txt", vec![]), ("s_two.txt", vec![])]);
        let one = Table::from_rows("s_one.txt", &["Sample Name"], &[vec![Some("A")]]);
        let two = Table::from_rows("s_two.txt", &["Sample Name"], &[vec![Some("B")]]);
        let doc = Investigation::build(&inv, vec![one, two], vec![]).unwrap();

        assert!(matches!(doc.select_study(None), Err(IsaError::AmbiguousStudy(2))));
        assert_eq!(doc.select_study(Some("s_two.txt")).unwrap().samples[0].name, "B");
        assert!(matches!(
            doc.select_study(Some("s_three.txt")),
            Err(IsaError::StudyNotFound(_))
        ));

        let restricted = doc.restrict_to("s_one.txt").unwrap();
        assert_eq!(restricted.studies.len(), 1);
        assert_eq!(restricted.select_study(None).unwrap().filename, "s_one.txt");
    }

    #[test]
    fn test_shared_assay_scanned_once() {
        let inv = investigation_table(&[("s_one.txt", vec!["a_shared.txt"]), ("s_two.txt", vec!["a_shared.txt"])]);
        let one = Table::from_rows("s_one.txt", &["Sample Name"], &[vec![Some("A")]]);
        let two = Table::from_rows("s_two.txt", &["Sample Name"], &[vec![Some("B")]]);
        let assay = Table::from_rows("a_shared.txt", &["Sample Name"], &[vec![Some("A")]]);
        let doc = Investigation::build(&inv, vec![one, two], vec![assay]).unwrap();

        assert_eq!(doc.sheets().len(), 3);
        assert_eq!(doc.assay_sheets().len(), 1);
        assert_eq!(doc.assays().count(), 2);
    }

    #[test]
    fn test_study_file_referenced_twice() {
        let inv = investigation_table(&[("s_study.txt", vec![]), ("s_study.txt", vec![])]);
        let study = Table::from_rows("s_study.txt", &["Sample Name"], &[vec![Some("S1")]]);
        let doc = Investigation::build(&inv, vec![study], vec![]).unwrap();

        assert_eq!(doc.studies.len(), 2);
        assert_eq!(doc.sheets().len(), 1);
        let samples: Vec<&str> = doc.samples().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(samples, vec!["S1", "S1"]);
    }
}
