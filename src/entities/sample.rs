//! Samples and the sources they derive from

use serde::{Deserialize, Serialize};

use crate::entities::value::{Characteristic, FactorValue};

/// A biological source material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            characteristics: Vec::new(),
        }
    }
}

/// A sample, identified by name within its study
///
/// Characteristics are not stored here: they belong to the sources named in
/// `derives_from` and are resolved through the owning study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    #[serde(default)]
    pub factor_values: Vec<FactorValue>,
    #[serde(default)]
    pub derives_from: Vec<String>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factor_values: Vec::new(),
            derives_from: Vec::new(),
        }
    }

    /// Factor value for a factor name, if the sample carries it
    pub fn factor_value(&self, factor_name: &str) -> Option<&FactorValue> {
        self.factor_values
            .iter()
            .find(|fv| fv.factor_name == factor_name)
    }

    /// Record a factor value unless one for the same factor is already known
    pub(crate) fn add_factor_value(&mut self, fv: FactorValue) {
        if self.factor_value(&fv.factor_name).is_none() {
            self.factor_values.push(fv);
        }
    }

    pub(crate) fn add_source(&mut self, source_name: &str) {
        if !self.derives_from.iter().any(|s| s == source_name) {
            self.derives_from.push(source_name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::value::Value;

    #[test]
    fn test_first_factor_value_wins() {
        let mut sample = Sample::new("S1");
        sample.add_factor_value(FactorValue {
            factor_name: "Dose".into(),
            value: Value::Scalar("10".into()),
            unit: None,
        });
        sample.add_factor_value(FactorValue {
            factor_name: "Dose".into(),
            value: Value::Scalar("20".into()),
            unit: None,
        });
        assert_eq!(sample.factor_values.len(), 1);
        assert_eq!(sample.factor_value("Dose").unwrap().value.display(), "10");
    }

    #[test]
    fn test_sources_are_deduplicated() {
        let mut sample = Sample::new("S1");
        sample.add_source("src1");
        sample.add_source("src2");
        sample.add_source("src1");
        assert_eq!(sample.derives_from, vec!["src1", "src2"]);
    }
}
