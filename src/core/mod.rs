//! Core module - sheets, loading, configuration and errors

pub mod columns;
pub mod config;
pub mod error;
pub mod loader;
pub mod sheet;
pub mod table;

pub use config::Config;
pub use error::{IsaError, MalformedReason};
pub use loader::{load_bundle, read_investigation, read_table, LoadError, LoadOptions};
pub use sheet::{InvestigationSheet, StudyRef};
pub use table::{Row, Table};
