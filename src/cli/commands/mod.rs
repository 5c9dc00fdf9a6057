//! CLI command implementations

pub mod completions;
pub mod config;
pub mod data;
pub mod factors;
pub mod names;
pub mod studies;
pub mod summary;
