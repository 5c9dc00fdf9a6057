//! Study sheets: samples, sources and assays

use std::collections::HashMap;

use crate::core::columns::{self, SAMPLE_NAME, SOURCE_NAME};
use crate::core::error::{IsaError, MalformedReason};
use crate::core::sheet::StudyRef;
use crate::core::table::Table;
use crate::entities::assay::Assay;
use crate::entities::sample::{Sample, Source};
use crate::entities::value::{Characteristic, FactorValue, Value};

/// A study and everything it owns
#[derive(Debug, Clone)]
pub struct Study {
    pub identifier: String,
    pub filename: String,
    /// Factors declared in the investigation sheet
    pub declared_factors: Vec<String>,
    pub samples: Vec<Sample>,
    pub sources: Vec<Source>,
    pub assays: Vec<Assay>,
    table: Table,
}

impl Study {
    /// Build a study from its sheet and its assays' sheets
    ///
    /// Samples are the union of the `Sample Name` values of all these sheets,
    /// in first-seen order (study sheet first).
    pub(crate) fn build(
        reference: &StudyRef,
        table: Table,
        assay_tables: Vec<Table>,
    ) -> Result<Self, IsaError> {
        require_sample_column(&table)?;

        let assays = assay_tables
            .into_iter()
            .map(|t| Assay::from_table(t, &reference.filename))
            .collect::<Result<Vec<_>, _>>()?;

        let mut samples = SampleCollector::default();
        let mut sources: Vec<Source> = Vec::new();

        collect_sheet(&table, &mut samples, &mut sources);
        for assay in &assays {
            collect_sheet(assay.table(), &mut samples, &mut sources);
        }

        Ok(Self {
            identifier: reference.identifier.clone(),
            filename: reference.filename.clone(),
            declared_factors: reference.declared_factors.clone(),
            samples: samples.samples,
            sources,
            assays,
            table,
        })
    }

    /// The underlying study sheet
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.name == name)
    }

    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Sources a sample derives from, resolved by name
    pub fn sources_of<'a>(&'a self, sample: &'a Sample) -> impl Iterator<Item = &'a Source> + 'a {
        sample
            .derives_from
            .iter()
            .filter_map(move |name| self.source(name))
    }

    /// Characteristics a sample inherits from its sources
    pub fn characteristics_of<'a>(
        &'a self,
        sample: &'a Sample,
    ) -> impl Iterator<Item = &'a Characteristic> + 'a {
        self.sources_of(sample)
            .flat_map(|source| source.characteristics.iter())
    }
}

fn require_sample_column(table: &Table) -> Result<(), IsaError> {
    if table.has_column(SAMPLE_NAME) {
        Ok(())
    } else {
        Err(IsaError::malformed(MalformedReason::MissingColumn {
            sheet: table.name().to_string(),
            column: SAMPLE_NAME.to_string(),
        }))
    }
}

#[derive(Default)]
struct SampleCollector {
    samples: Vec<Sample>,
    index: HashMap<String, usize>,
}

impl SampleCollector {
    fn entry(&mut self, name: &str) -> &mut Sample {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.samples.push(Sample::new(name));
                self.index.insert(name.to_string(), self.samples.len() - 1);
                self.samples.len() - 1
            }
        };
        &mut self.samples[idx]
    }
}

/// Scan one sheet for samples, their factor values and their sources
///
/// `Characteristics[..]` columns placed before the `Sample Name` column
/// describe the row's source; later ones describe the sample and are not
/// modelled.
fn collect_sheet(table: &Table, samples: &mut SampleCollector, sources: &mut Vec<Source>) {
    let Some(sample_idx) = table.column_index(SAMPLE_NAME) else {
        return;
    };
    let source_idx = table.column_index(SOURCE_NAME);

    let factor_columns: Vec<(usize, &str)> = table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(i, h)| columns::factor_name(h).map(|name| (i, name)))
        .collect();
    let characteristic_columns: Vec<(usize, &str)> = table
        .columns()
        .iter()
        .enumerate()
        .take(sample_idx)
        .filter_map(|(i, h)| columns::characteristic_category(h).map(|c| (i, c)))
        .collect();

    for row in table.rows() {
        let source_name = source_idx
            .and_then(|i| row.cell(i))
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let Some(source_name) = source_name {
            let pos = match sources.iter().position(|s| s.name == source_name) {
                Some(pos) => pos,
                None => {
                    sources.push(Source::new(source_name));
                    sources.len() - 1
                }
            };
            let source = &mut sources[pos];
            for &(idx, category) in &characteristic_columns {
                if source.characteristics.iter().any(|c| c.category == category) {
                    continue;
                }
                if let Some((value, unit)) = Value::read(table, row, idx) {
                    source.characteristics.push(Characteristic {
                        category: category.to_string(),
                        value,
                        unit,
                    });
                }
            }
        }

        let Some(sample_name) = row
            .cell(sample_idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };
        let sample = samples.entry(sample_name);

        if let Some(source_name) = source_name {
            sample.add_source(source_name);
        }
        for &(idx, factor_name) in &factor_columns {
            if let Some((value, unit)) = Value::read(table, row, idx) {
                sample.add_factor_value(FactorValue {
                    factor_name: factor_name.to_string(),
                    value,
                    unit,
                });
            }
        }
    }
}
