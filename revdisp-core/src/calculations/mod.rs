//! Program calculators.
//!
//! Each socio-fiscal program is one [`ProgramCalculator`]: a pure function of
//! the household, the tax-year context of the program's jurisdiction, and the
//! results of the programs it declared as dependencies. Calculators are
//! grouped by the subtotal they feed:
//!
//! - [`contributions`]: payroll and health contributions;
//! - [`quebec`]: Quebec income tax and Quebec transfers;
//! - [`federal`]: federal income tax and federal transfers.

pub mod common;
pub mod contributions;
pub mod federal;
pub mod income;
pub mod quebec;

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, ProgramResult, TaxYearContext};

/// One socio-fiscal program.
///
/// Implementations must be deterministic and free of side effects: the same
/// household, context and prior results always produce the same amounts.
pub trait ProgramCalculator: Send + Sync {
    /// The program this calculator computes.
    fn program(&self) -> ProgramId;

    /// Programs whose results this calculator reads.
    fn dependencies(&self) -> &'static [ProgramId] {
        &[]
    }

    /// Names of the parameters this calculator reads from its context.
    fn required_parameters(&self) -> &'static [&'static str];

    /// True when the program is computed on pooled household income rather
    /// than adult by adult.
    fn pools_household_income(&self) -> bool {
        false
    }

    /// Computes the program's amount for each adult, as a non-negative
    /// magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] when the context lacks a
    /// parameter and [`EngineError::UndeclaredDependency`] when reading a
    /// result that was not declared.
    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError>;
}

/// Read-only view of the results computed so far, restricted to the
/// dependencies the reading calculator declared.
#[derive(Debug, Clone, Copy)]
pub struct PriorResults<'a> {
    reader: ProgramId,
    results: &'a BTreeMap<ProgramId, ProgramResult>,
    visible: &'a [ProgramId],
}

impl<'a> PriorResults<'a> {
    pub fn new(
        reader: ProgramId,
        results: &'a BTreeMap<ProgramId, ProgramResult>,
        visible: &'a [ProgramId],
    ) -> Self {
        Self {
            reader,
            results,
            visible,
        }
    }

    /// Returns the result of `program`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UndeclaredDependency`] if `program` was not
    /// declared by the reader or has not been computed.
    pub fn get(
        &self,
        program: ProgramId,
    ) -> Result<&'a ProgramResult, EngineError> {
        let undeclared = || EngineError::UndeclaredDependency {
            program: self.reader,
            dependency: program,
        };
        if !self.visible.contains(&program) {
            return Err(undeclared());
        }
        self.results.get(&program).ok_or_else(undeclared)
    }

    /// Per-adult amounts of `program`.
    pub fn split(
        &self,
        program: ProgramId,
    ) -> Result<AdultSplit, EngineError> {
        self.get(program).map(|result| result.split)
    }
}

/// Every calculator the engine ships, in no particular order.
pub fn standard_calculators() -> Vec<Box<dyn ProgramCalculator>> {
    vec![
        Box::new(contributions::EmploymentInsurance),
        Box::new(contributions::ParentalInsurance),
        Box::new(contributions::QuebecPensionPlan),
        Box::new(contributions::HealthServicesFund),
        Box::new(contributions::DrugInsurance),
        Box::new(quebec::QuebecIncomeTax),
        Box::new(quebec::FamilyAllowance),
        Box::new(quebec::SchoolSupplies),
        Box::new(quebec::SolidarityCredit),
        Box::new(quebec::ChildcareCredit),
        Box::new(quebec::WorkPremium),
        Box::new(quebec::SeniorAssistance),
        Box::new(quebec::SocialAssistance),
        Box::new(federal::FederalIncomeTax),
        Box::new(federal::QuebecAbatement),
        Box::new(federal::ChildBenefit),
        Box::new(federal::GstCredit),
        Box::new(federal::WorkersBenefit),
        Box::new(federal::OldAgeSecurity),
        Box::new(federal::GuaranteedIncomeSupplement),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use crate::models::{AdultSplit, ProgramId, ProgramResult};

    /// Builds a results map from `(program, adult1, adult2)` triples.
    pub fn results(entries: &[(ProgramId, Decimal, Decimal)]) -> BTreeMap<ProgramId, ProgramResult> {
        entries
            .iter()
            .map(|&(program, adult1, adult2)| {
                (
                    program,
                    ProgramResult::new(program, 2024, "test", AdultSplit::new(adult1, adult2)),
                )
            })
            .collect()
    }
}
