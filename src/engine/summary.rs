//! Per-sample summary records and factor groups

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

use crate::entities::Investigation;

/// Key of the sample name in serialized records
pub const SAMPLE_NAME_KEY: &str = "sample_name";

/// Key carrying the source name when a sample has exactly one source
pub const SOURCE_NAME_KEY: &str = "source_name";

/// One sample's summary: its name plus an ordered set of fields
///
/// Records are heterogeneous; not every sample carries every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    pub sample_name: String,
    fields: Vec<(String, String)>,
}

impl SummaryRecord {
    pub fn new(sample_name: impl Into<String>) -> Self {
        Self {
            sample_name: sample_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, keeping its position if the key already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key == SAMPLE_NAME_KEY {
            return;
        }
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    /// Fields other than the sample name, in insertion order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl Serialize for SummaryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(SAMPLE_NAME_KEY, &self.sample_name)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Unpruned records, one per sample of every study
///
/// Factor values come first, then `source_name` when the sample derives
/// from exactly one source, then the characteristics inherited from its
/// sources.
pub fn sample_records(document: &Investigation) -> Vec<SummaryRecord> {
    document
        .samples()
        .map(|(study, sample)| {
            let mut record = SummaryRecord::new(&sample.name);
            for fv in &sample.factor_values {
                record.set(&fv.factor_name, fv.value.display());
            }
            if let [source] = sample.derives_from.as_slice() {
                record.set(SOURCE_NAME_KEY, source);
            }
            for characteristic in study.characteristics_of(sample) {
                record.set(&characteristic.category, characteristic.value.display());
            }
            record
        })
        .collect()
}

/// Sample records with constant fields dropped
pub fn sample_summary(document: &Investigation) -> Vec<SummaryRecord> {
    let mut records = sample_records(document);
    prune_constant_fields(&mut records);
    records
}

/// Factor values only, pruned like [`sample_summary`]
///
/// This is the record set study groups are formed from.
pub fn factor_summary(document: &Investigation) -> Vec<SummaryRecord> {
    let mut records: Vec<SummaryRecord> = document
        .samples()
        .map(|(_, sample)| {
            let mut record = SummaryRecord::new(&sample.name);
            for fv in &sample.factor_values {
                record.set(&fv.factor_name, fv.value.display());
            }
            record
        })
        .collect();
    prune_constant_fields(&mut records);
    records
}

/// Inherited characteristics only, pruned like [`sample_summary`]
pub fn characteristics_summary(document: &Investigation) -> Vec<SummaryRecord> {
    let mut records: Vec<SummaryRecord> = document
        .samples()
        .map(|(study, sample)| {
            let mut record = SummaryRecord::new(&sample.name);
            for characteristic in study.characteristics_of(sample) {
                record.set(&characteristic.category, characteristic.value.display());
            }
            record
        })
        .collect();
    prune_constant_fields(&mut records);
    records
}

/// Drop every key that takes a single value across the records holding it
///
/// A record missing the key does not make it variable.
pub fn prune_constant_fields(records: &mut [SummaryRecord]) {
    let mut first_value: HashMap<&str, &str> = HashMap::new();
    let mut variable: Vec<String> = Vec::new();

    for record in records.iter() {
        for (key, value) in &record.fields {
            match first_value.get(key.as_str()) {
                None => {
                    first_value.insert(key, value);
                }
                Some(first) if *first != value.as_str() && !variable.contains(key) => {
                    variable.push(key.clone());
                }
                Some(_) => {}
            }
        }
    }

    let constant: Vec<String> = first_value
        .into_keys()
        .filter(|key| !variable.iter().any(|v| v.as_str() == *key))
        .map(str::to_string)
        .collect();

    for record in records.iter_mut() {
        record.fields.retain(|(key, _)| !constant.contains(key));
    }
}

/// Samples sharing the same remaining field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyGroup {
    pub fields: Vec<(String, String)>,
    pub samples: Vec<String>,
}

impl StudyGroup {
    /// The group's values alone, in field order
    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|(_, v)| v.as_str()).collect()
    }

    /// `factor: value, factor: value`
    pub fn label(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn size(&self) -> usize {
        self.samples.len()
    }
}

/// Group records by all their non-`sample_name` fields, first-seen order
pub fn group_by_factors(summary: &[SummaryRecord]) -> Vec<StudyGroup> {
    let mut groups: Vec<StudyGroup> = Vec::new();
    for record in summary {
        match groups.iter_mut().find(|g| g.fields == record.fields) {
            Some(group) => group.samples.push(record.sample_name.clone()),
            None => groups.push(StudyGroup {
                fields: record.fields.clone(),
                samples: vec![record.sample_name.clone()],
            }),
        }
    }
    groups
}

/// `(label, sample count)` per group
pub fn group_sizes(groups: &[StudyGroup]) -> Vec<(String, usize)> {
    groups.iter().map(|g| (g.label(), g.size())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Table;
    use crate::entities::investigation::fixtures::{investigation_table, treatment_document};

    fn mixed_document() -> Investigation {
        let study = Table::from_rows(
            "s_study.txt",
            &[
                "Source Name",
                "Characteristics[Organism]",
                "Characteristics[Sex]",
                "Sample Name",
                "Factor Value[Dose]",
                "Unit",
                "Factor Value[Time]",
            ],
            &[
                vec![Some("p1"), Some("Homo sapiens"), Some("F"), Some("S1"), Some("10"), Some("mg"), Some("1")],
                vec![Some("p2"), Some("Homo sapiens"), Some("M"), Some("S2"), Some("20"), Some("mg"), Some("1")],
                vec![Some("p3"), Some("Homo sapiens"), Some("M"), Some("S3"), Some("10"), Some("mg"), Some("1")],
                vec![None, None, None, Some("S4"), None, None, None],
            ],
        );
        Investigation::build(
            &investigation_table(&[("s_study.txt", vec![])]),
            vec![study],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_record_without_values_is_only_the_name() {
        let doc = mixed_document();
        let records = sample_records(&doc);
        let s4 = records.iter().find(|r| r.sample_name == "S4").unwrap();
        assert!(s4.fields().is_empty());
        assert_eq!(serde_json::to_string(s4).unwrap(), r#"{"sample_name":"S4"}"#);
    }

    #[test]
    fn test_record_field_order() {
        let doc = mixed_document();
        let records = sample_records(&doc);
        let keys: Vec<&str> = records[0].fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Dose", "Time", "source_name", "Organism", "Sex"]);
        assert_eq!(records[0].get("Dose"), Some("10"));
    }

    #[test]
    fn test_constant_fields_pruned() {
        let doc = mixed_document();
        let summary = sample_summary(&doc);
        assert_eq!(summary.len(), 4);

        for record in &summary {
            assert!(record.get("Organism").is_none());
            assert!(record.get("Time").is_none());
        }
        let s1 = &summary[0];
        let keys: Vec<&str> = s1.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Dose", "source_name", "Sex"]);
        assert_eq!(
            serde_json::to_string(s1).unwrap(),
            r#"{"sample_name":"S1","Dose":"10","source_name":"p1","Sex":"F"}"#
        );
    }

    #[test]
    fn test_no_remaining_key_is_constant() {
        let doc = mixed_document();
        let summary = sample_summary(&doc);
        let mut keys: Vec<&str> = summary
            .iter()
            .flat_map(|r| r.fields().iter().map(|(k, _)| k.as_str()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        for key in keys {
            let mut values: Vec<&str> = summary.iter().filter_map(|r| r.get(key)).collect();
            values.dedup();
            values.sort_unstable();
            values.dedup();
            assert!(values.len() > 1, "{} is constant", key);
        }
    }

    #[test]
    fn test_characteristics_summary() {
        let doc = mixed_document();
        let summary = characteristics_summary(&doc);
        assert_eq!(summary[1].fields(), &[("Sex".to_string(), "M".to_string())]);
        assert!(summary[3].fields().is_empty());
    }

    #[test]
    fn test_treatment_groups() {
        let doc = treatment_document();
        let summary = sample_summary(&doc);
        // source_name differs per sample, so drop it to group by treatment
        let mut by_factor = summary.clone();
        for record in &mut by_factor {
            record.remove(SOURCE_NAME_KEY);
        }
        let groups = group_by_factors(&by_factor);
        assert_eq!(
            group_sizes(&groups),
            vec![("Treatment: drug".to_string(), 2), ("Treatment: control".to_string(), 1)]
        );
        assert_eq!(groups[0].samples, vec!["S1", "S2"]);
        assert_eq!(groups[1].values(), vec!["control"]);
    }

    #[test]
    fn test_factor_summary_groups() {
        let doc = mixed_document();
        let groups = group_by_factors(&factor_summary(&doc));
        assert_eq!(
            group_sizes(&groups),
            vec![
                ("Dose: 10".to_string(), 2),
                ("Dose: 20".to_string(), 1),
                (String::new(), 1),
            ]
        );
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut record = SummaryRecord::new("S1");
        record.set("a", "1");
        record.set("b", "2");
        record.set("a", "3");
        record.set(SAMPLE_NAME_KEY, "ignored");
        assert_eq!(
            record.fields(),
            &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(record.sample_name, "S1");
    }
}
