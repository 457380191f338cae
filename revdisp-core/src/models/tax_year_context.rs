//! Immutable parameter snapshot for one tax year and one jurisdiction.
//!
//! A context is built once from the rows of a parameter table and shared
//! read-only between every calculator and every household. Lookups never
//! default: a missing parameter is an [`EngineError::InvalidParameter`].
//!
//! Bracket schedules are validated on construction:
//!
//! - the first band starts at 0;
//! - bands are contiguous (each lower bound equals the previous upper bound);
//! - only the last band is unbounded, and it must be;
//! - every rate lies between 0 and 1.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{Jurisdiction, ParameterRecord, ProgramId, TaxBracket};
use crate::error::EngineError;

type Key = (ProgramId, String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxYearContext {
    year: i32,
    jurisdiction: Jurisdiction,
    amounts: BTreeMap<Key, Decimal>,
    schedules: BTreeMap<Key, Vec<TaxBracket>>,
}

impl TaxYearContext {
    /// Builds a context from the rows of one (year, jurisdiction) table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if a row belongs to another
    /// year or jurisdiction, a scalar is defined twice, or a schedule is not
    /// well formed.
    pub fn from_records(
        year: i32,
        jurisdiction: Jurisdiction,
        records: impl IntoIterator<Item = ParameterRecord>,
    ) -> Result<Self, EngineError> {
        let mut amounts = BTreeMap::new();
        let mut schedules: BTreeMap<Key, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            let invalid = |reason: String| EngineError::InvalidParameter {
                year,
                jurisdiction,
                program: record.program,
                parameter: record.parameter.clone(),
                reason,
            };

            if record.tax_year != year || record.jurisdiction != jurisdiction {
                return Err(invalid(format!(
                    "row belongs to {} {}",
                    record.jurisdiction, record.tax_year
                )));
            }
            if record.program.jurisdiction() != jurisdiction {
                return Err(invalid(format!(
                    "program is configured by {}",
                    record.program.jurisdiction()
                )));
            }

            let key = (record.program, record.parameter.clone());
            if record.is_bracket() {
                let lower = record
                    .min_income
                    .ok_or_else(|| invalid("bracket row without min_income".to_string()))?;
                schedules
                    .entry(key)
                    .or_default()
                    .push(TaxBracket::new(lower, record.max_income, record.value));
            } else if amounts.insert(key, record.value).is_some() {
                return Err(invalid("defined more than once".to_string()));
            }
        }

        for ((program, parameter), brackets) in schedules.iter_mut() {
            brackets.sort_by(|a, b| a.lower.cmp(&b.lower));
            validate_schedule(brackets).map_err(|reason| EngineError::InvalidParameter {
                year,
                jurisdiction,
                program: *program,
                parameter: parameter.clone(),
                reason,
            })?;
        }

        Ok(Self {
            year,
            jurisdiction,
            amounts,
            schedules,
        })
    }

    /// Starts a programmatic table for `year` and `jurisdiction`.
    pub fn builder(
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> TaxYearContextBuilder {
        TaxYearContextBuilder {
            year,
            jurisdiction,
            records: Vec::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    /// Looks up a scalar parameter.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the table does not define it.
    pub fn amount(
        &self,
        program: ProgramId,
        parameter: &str,
    ) -> Result<Decimal, EngineError> {
        self.amounts
            .get(&(program, parameter.to_string()))
            .copied()
            .ok_or_else(|| self.missing(program, parameter))
    }

    /// Looks up a bracket schedule, lowest band first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the table does not define it.
    pub fn schedule(
        &self,
        program: ProgramId,
        parameter: &str,
    ) -> Result<&[TaxBracket], EngineError> {
        self.schedules
            .get(&(program, parameter.to_string()))
            .map(Vec::as_slice)
            .ok_or_else(|| self.missing(program, parameter))
    }

    /// True when either a scalar or a schedule named `parameter` exists.
    pub fn contains(
        &self,
        program: ProgramId,
        parameter: &str,
    ) -> bool {
        let key = (program, parameter.to_string());
        self.amounts.contains_key(&key) || self.schedules.contains_key(&key)
    }

    /// Number of scalar parameters plus schedules held by this context.
    pub fn len(&self) -> usize {
        self.amounts.len() + self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn missing(
        &self,
        program: ProgramId,
        parameter: &str,
    ) -> EngineError {
        EngineError::InvalidParameter {
            year: self.year,
            jurisdiction: self.jurisdiction,
            program,
            parameter: parameter.to_string(),
            reason: "missing from parameter table".to_string(),
        }
    }
}

fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), String> {
    let Some(first) = brackets.first() else {
        return Err("empty schedule".to_string());
    };
    if !first.lower.is_zero() {
        return Err(format!("first band starts at {} instead of 0", first.lower));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(format!("rate {} outside 0..=1", bracket.rate));
        }
        let is_last = index + 1 == brackets.len();
        match (bracket.upper, is_last) {
            (None, true) => {}
            (None, false) => return Err(format!("band starting at {} is unbounded", bracket.lower)),
            (Some(upper), true) => return Err(format!("top band ends at {upper}")),
            (Some(upper), false) => {
                if upper <= bracket.lower {
                    return Err(format!("band {}..{upper} is empty", bracket.lower));
                }
                let next = brackets[index + 1].lower;
                if next != upper {
                    return Err(format!("gap or overlap between {upper} and {next}"));
                }
            }
        }
    }

    Ok(())
}

/// Collects parameter rows and builds a [`TaxYearContext`] through the same
/// validation as table loading.
#[derive(Debug, Clone)]
pub struct TaxYearContextBuilder {
    year: i32,
    jurisdiction: Jurisdiction,
    records: Vec<ParameterRecord>,
}

impl TaxYearContextBuilder {
    pub fn amount(
        mut self,
        program: ProgramId,
        parameter: &str,
        value: Decimal,
    ) -> Self {
        self.records
            .push(ParameterRecord::scalar(self.year, program, parameter, value));
        self
    }

    /// Adds one band; pass `None` as `upper` for the top band.
    pub fn bracket(
        mut self,
        program: ProgramId,
        parameter: &str,
        lower: Decimal,
        upper: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        self.records.push(ParameterRecord::bracket(
            self.year, program, parameter, lower, upper, rate,
        ));
        self
    }

    pub fn build(self) -> Result<TaxYearContext, EngineError> {
        TaxYearContext::from_records(self.year, self.jurisdiction, self.records)
    }
}
