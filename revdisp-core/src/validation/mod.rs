//! Differential validation against an independent reference engine.
//!
//! The validator runs the same household through the [`Orchestrator`] and a
//! [`ReferenceOracle`], then compares every named amount present on both
//! sides. Two amounts agree when they differ by at most the tolerance
//! ([`DEFAULT_TOLERANCE`], one cent). Mismatches are reported as data;
//! only failures to produce a record at all are errors.
//!
//! [`Orchestrator`]: crate::engine::Orchestrator

mod oracle;
mod validator;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::error::EngineError;

pub use oracle::{OracleError, ReferenceOracle, ReferenceRecord};
pub use validator::{BatchReport, ComparisonReport, DifferentialValidator, FieldMismatch};

/// Largest difference at which two amounts are still considered equal.
///
/// The bound is inclusive: amounts exactly one cent apart agree.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("reference oracle failed for household '{household}' in {year}: {reason}")]
    Oracle {
        household: String,
        year: i32,
        reason: String,
    },
}
