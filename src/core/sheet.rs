//! Investigation sheet reader
//!
//! The investigation file is not a column table like study and assay
//! sheets: every line is a field label followed by its values, grouped in
//! sections (`INVESTIGATION`, `STUDY`, `STUDY ASSAYS`, ...). The loader hands
//! it over as a [`Table`] whose first cell of each row is the label.

use crate::core::table::Table;

/// A study declared by the investigation sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyRef {
    pub identifier: String,
    pub filename: String,
    pub assay_filenames: Vec<String>,
    pub declared_factors: Vec<String>,
}

/// The parts of an investigation sheet the document model needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestigationSheet {
    pub identifier: String,
    pub studies: Vec<StudyRef>,
}

impl InvestigationSheet {
    pub fn parse(table: &Table) -> Self {
        let mut sheet = InvestigationSheet::default();
        let mut current: Option<StudyRef> = None;

        for row in table.rows() {
            let Some(label) = row.cell(0).map(str::trim) else {
                continue;
            };
            let mut values = (1..row.len())
                .filter_map(|i| row.cell(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            match label {
                "STUDY" => {
                    if let Some(study) = current.take() {
                        sheet.studies.push(study);
                    }
                    current = Some(StudyRef::default());
                }
                "Investigation Identifier" => {
                    if let Some(id) = values.next() {
                        sheet.identifier = id;
                    }
                }
                "Study Identifier" => {
                    if let (Some(study), Some(id)) = (current.as_mut(), values.next()) {
                        study.identifier = id;
                    }
                }
                "Study File Name" => {
                    if let (Some(study), Some(file)) = (current.as_mut(), values.next())
                    {
                        study.filename = file;
                    }
                }
                "Study Assay File Name" => {
                    if let Some(study) = current.as_mut() {
                        study.assay_filenames.extend(values);
                    }
                }
                "Study Factor Name" => {
                    if let Some(study) = current.as_mut() {
                        study.declared_factors.extend(values);
                    }
                }
                _ => {}
            }
        }

        if let Some(study) = current.take() {
            sheet.studies.push(study);
        }
        // A STUDY section without a file name references nothing loadable
        sheet.studies.retain(|s| !s.filename.is_empty());
        sheet
    }
}
