//! isaslice: query and slice ISA-Tab metadata
//!
//! Loads an unpacked ISA-Tab directory (investigation, study and assay
//! sheets) into a document model, lists its factors, selects samples by
//! factor value and collects the data files they generated.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
pub mod report;
