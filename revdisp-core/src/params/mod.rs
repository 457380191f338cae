//! Versioned parameter tables and the cache that serves them.
//!
//! A [`ParameterSource`] knows which (year, jurisdiction) tables exist and
//! can produce their rows; the [`ParameterStore`] turns those rows into
//! immutable [`TaxYearContext`](crate::models::TaxYearContext) snapshots and
//! caches one per key for the life of the process.

mod source;
mod store;

pub use source::{MemorySource, ParameterSource};
pub use store::ParameterStore;
