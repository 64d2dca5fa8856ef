//! Release and repository value types.
//!
//! These are the values that flow from the upstream query through the checker
//! to the sinks: a [`Repository`] coordinate with its latest known [`Release`]
//! snapshot, plus the stability classification used by the pre-release filter.

mod release;
mod repository;

pub use release::{is_nonstable_tag, Release};
pub use repository::Repository;
