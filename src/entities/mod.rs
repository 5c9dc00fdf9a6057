//! Document model
//!
//! An ISA-Tab document is built once from its sheets:
//!
//! - [`Investigation`] - the root, owning its studies in sheet order
//! - [`Study`] - samples, sources and assays of one study sheet
//! - [`Assay`] - one assay sheet and the [`DataFile`]s it lists
//! - [`Sample`] / [`Source`] - linked by name through `derives_from`
//! - [`FactorValue`] / [`Characteristic`] - values attached to samples and sources
//!
//! Cross-sheet identity is by name: a sample named in several sheets is one
//! sample, and data files refer to samples by name rather than by reference.

pub mod assay;
pub mod investigation;
pub mod sample;
pub mod study;
pub mod value;

pub use assay::{Assay, DataFile};
pub use investigation::Investigation;
pub use sample::{Sample, Source};
pub use study::Study;
pub use value::{Characteristic, FactorValue, OntologyTerm, Value};
