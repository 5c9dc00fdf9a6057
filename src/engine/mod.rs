//! Query engine over a built document
//!
//! Every operation here is a read-only traversal of an [`Investigation`]
//! and never logs or touches the filesystem.
//!
//! [`Investigation`]: crate::entities::Investigation

pub mod factors;
pub mod names;
pub mod slice;
pub mod summary;

pub use factors::{factor_combinations, factor_values, factors, require_factor};
pub use names::{normalize, variable_names};
pub use slice::{data_for_sample, slice, sources_for_sample, FactorSelection, QueryError, SliceEntry};
pub use summary::{
    characteristics_summary, factor_summary, group_by_factors, group_sizes, sample_summary, StudyGroup,
    SummaryRecord,
};
