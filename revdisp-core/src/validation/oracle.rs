use std::collections::BTreeMap;
use std::fmt::Display;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::engine::Orchestrator;
use crate::models::Household;

/// Named amounts produced by a reference engine, keyed like
/// [`DisposableIncomeResult::fields`](crate::models::DisposableIncomeResult::fields).
pub type ReferenceRecord = BTreeMap<String, Decimal>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct OracleError {
    pub reason: String,
}

impl OracleError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// An independent engine queried with the same household and year.
///
/// Any `Fn(&Household, i32) -> Result<ReferenceRecord, E>` is an oracle.
pub trait ReferenceOracle: Sync {
    fn reference(
        &self,
        household: &Household,
        year: i32,
    ) -> Result<ReferenceRecord, OracleError>;
}

impl<F, E> ReferenceOracle for F
where
    F: Fn(&Household, i32) -> Result<ReferenceRecord, E> + Sync,
    E: Display,
{
    fn reference(
        &self,
        household: &Household,
        year: i32,
    ) -> Result<ReferenceRecord, OracleError> {
        self(household, year).map_err(|err| OracleError::new(err.to_string()))
    }
}

/// A second orchestrator, typically built over an independently loaded
/// parameter store, serves as a reference.
impl ReferenceOracle for Orchestrator {
    fn reference(
        &self,
        household: &Household,
        year: i32,
    ) -> Result<ReferenceRecord, OracleError> {
        self.evaluate(household, year)
            .map(|result| result.fields())
            .map_err(|err| OracleError::new(err.to_string()))
    }
}
