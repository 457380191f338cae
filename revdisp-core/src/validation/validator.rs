use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::{DEFAULT_TOLERANCE, ReferenceOracle, ValidationError};
use crate::engine::Orchestrator;
use crate::models::Household;

/// One field on which the engine and the oracle disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    pub field: String,
    pub engine: Decimal,
    pub oracle: Decimal,
    /// `engine - oracle`.
    pub difference: Decimal,
}

/// Outcome of comparing one household for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub household: String,
    pub year: i32,
    pub compared: usize,
    pub mismatches: Vec<FieldMismatch>,
    /// Fields only the engine produced.
    pub engine_only: Vec<String>,
    /// Fields only the oracle produced.
    pub oracle_only: Vec<String>,
}

impl ComparisonReport {
    /// True when at least one field was compared and none diverged.
    pub fn passed(&self) -> bool {
        self.compared > 0 && self.mismatches.is_empty()
    }
}

/// Outcome of a batch of comparisons.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<ComparisonReport>,
    pub errors: Vec<ValidationError>,
    /// Set when the batch stopped early; households not reached appear in
    /// neither `reports` nor `errors`.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|report| report.passed()).count()
    }

    /// Reports with at least one mismatch or nothing compared.
    pub fn failures(&self) -> impl Iterator<Item = &ComparisonReport> {
        self.reports.iter().filter(|report| !report.passed())
    }

    pub fn mismatch_count(&self) -> usize {
        self.reports.iter().map(|report| report.mismatches.len()).sum()
    }

    /// True when every household was compared and passed.
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.errors.is_empty() && self.failures().next().is_none()
    }
}

/// Compares the engine against a reference oracle.
pub struct DifferentialValidator<'a> {
    engine: &'a Orchestrator,
    oracle: &'a dyn ReferenceOracle,
    tolerance: Decimal,
}

impl<'a> DifferentialValidator<'a> {
    pub fn new(
        engine: &'a Orchestrator,
        oracle: &'a dyn ReferenceOracle,
    ) -> Self {
        Self {
            engine,
            oracle,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(
        mut self,
        tolerance: Decimal,
    ) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Evaluates `household` on both sides and compares the shared fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Engine`] or [`ValidationError::Oracle`] when
    /// either side cannot produce a record.
    pub fn compare(
        &self,
        household: &Household,
        year: i32,
    ) -> Result<ComparisonReport, ValidationError> {
        let engine = self.engine.evaluate(household, year)?.fields();
        let oracle = self
            .oracle
            .reference(household, year)
            .map_err(|err| ValidationError::Oracle {
                household: household.label().to_string(),
                year,
                reason: err.reason,
            })?;

        let mut report = ComparisonReport {
            household: household.label().to_string(),
            year,
            compared: 0,
            mismatches: Vec::new(),
            engine_only: Vec::new(),
            oracle_only: oracle
                .keys()
                .filter(|field| !engine.contains_key(*field))
                .cloned()
                .collect(),
        };

        for (field, engine_value) in engine {
            let Some(oracle_value) = oracle.get(&field) else {
                report.engine_only.push(field);
                continue;
            };
            report.compared += 1;
            let difference = engine_value - oracle_value;
            if difference.abs() > self.tolerance {
                report.mismatches.push(FieldMismatch {
                    field,
                    engine: engine_value,
                    oracle: *oracle_value,
                    difference,
                });
            }
        }

        Ok(report)
    }

    /// Compares every household in parallel.
    ///
    /// `cancel` is checked before each household; once set, remaining
    /// households are skipped and the report is flagged as cancelled.
    pub fn compare_batch(
        &self,
        households: &[Household],
        year: i32,
        cancel: Option<&AtomicBool>,
    ) -> BatchReport {
        let cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

        let outcomes: Vec<Option<Result<ComparisonReport, ValidationError>>> = households
            .par_iter()
            .map(|household| {
                if cancelled() {
                    None
                } else {
                    Some(self.compare(household, year))
                }
            })
            .collect();

        let mut batch = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                None => batch.cancelled = true,
                Some(Ok(report)) => {
                    if !report.mismatches.is_empty() {
                        warn!(
                            household = %report.household,
                            year,
                            mismatches = report.mismatches.len(),
                            first = %report.mismatches[0].field,
                            "engine and reference disagree"
                        );
                    }
                    batch.reports.push(report);
                }
                Some(Err(err)) => {
                    warn!(year, error = %err, "comparison failed");
                    batch.errors.push(err);
                }
            }
        }

        info!(
            year,
            households = households.len(),
            compared = batch.reports.len(),
            passed = batch.passed(),
            mismatches = batch.mismatch_count(),
            errors = batch.errors.len(),
            cancelled = batch.cancelled,
            "batch comparison finished"
        );
        batch
    }
}
