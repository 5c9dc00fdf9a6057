//! ISA-Tab column header vocabulary
//!
//! Header matching is exact and case-sensitive. Bracketed headers carry a
//! free-text name (`Factor Value[Treatment]`) that is trimmed on extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const SAMPLE_NAME: &str = "Sample Name";
pub const SOURCE_NAME: &str = "Source Name";
pub const TERM_SOURCE_REF: &str = "Term Source REF";
pub const TERM_ACCESSION_NUMBER: &str = "Term Accession Number";
pub const UNIT: &str = "Unit";

const FACTOR_VALUE_PREFIX: &str = "Factor Value[";
const CHARACTERISTICS_PREFIX: &str = "Characteristics[";

/// Name inside a `Factor Value[...]` header
pub fn factor_name(header: &str) -> Option<&str> {
    bracketed(header, FACTOR_VALUE_PREFIX)
}

/// Category inside a `Characteristics[...]` header
pub fn characteristic_category(header: &str) -> Option<&str> {
    bracketed(header, CHARACTERISTICS_PREFIX)
}

fn bracketed<'a>(header: &'a str, prefix: &str) -> Option<&'a str> {
    header
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Columns holding data files generated while processing a sample
///
/// Variants are declared, and ordered, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataNode {
    RawDataFile,
    RawSpectralDataFile,
    DerivedSpectralDataFile,
    DerivedArrayDataFile,
    ArrayDataFile,
    ProteinAssignmentFile,
    PeptideAssignmentFile,
    PostTranslationalModificationAssignmentFile,
    AcquisitionParameterDataFile,
    FreeInductionDecayDataFile,
    DerivedArrayDataMatrixFile,
    ImageFile,
    DerivedDataFile,
    MetaboliteAssignmentFile,
}

impl DataNode {
    /// All data-node columns, in the order they are tried
    pub fn all() -> &'static [DataNode] {
        &[
            DataNode::RawDataFile,
            DataNode::RawSpectralDataFile,
            DataNode::DerivedSpectralDataFile,
            DataNode::DerivedArrayDataFile,
            DataNode::ArrayDataFile,
            DataNode::ProteinAssignmentFile,
            DataNode::PeptideAssignmentFile,
            DataNode::PostTranslationalModificationAssignmentFile,
            DataNode::AcquisitionParameterDataFile,
            DataNode::FreeInductionDecayDataFile,
            DataNode::DerivedArrayDataMatrixFile,
            DataNode::ImageFile,
            DataNode::DerivedDataFile,
            DataNode::MetaboliteAssignmentFile,
        ]
    }

    /// Column header for this node
    pub fn label(&self) -> &'static str {
        match self {
            DataNode::RawDataFile => "Raw Data File",
            DataNode::RawSpectralDataFile => "Raw Spectral Data File",
            DataNode::DerivedSpectralDataFile => "Derived Spectral Data File",
            DataNode::DerivedArrayDataFile => "Derived Array Data File",
            DataNode::ArrayDataFile => "Array Data File",
            DataNode::ProteinAssignmentFile => "Protein Assignment File",
            DataNode::PeptideAssignmentFile => "Peptide Assignment File",
            DataNode::PostTranslationalModificationAssignmentFile => {
                "Post Translational Modification Assignment File"
            }
            DataNode::AcquisitionParameterDataFile => "Acquisition Parameter Data File",
            DataNode::FreeInductionDecayDataFile => "Free Induction Decay Data File",
            DataNode::DerivedArrayDataMatrixFile => "Derived Array Data Matrix File",
            DataNode::ImageFile => "Image File",
            DataNode::DerivedDataFile => "Derived Data File",
            DataNode::MetaboliteAssignmentFile => "Metabolite Assignment File",
        }
    }

    /// Closed-set lookup from a column header
    pub fn from_label(header: &str) -> Option<Self> {
        Self::all().iter().copied().find(|n| n.label() == header)
    }
}

impl fmt::Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
