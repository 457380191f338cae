//! Guaranteed Income Supplement.
//!
//! Income-tested top-up for pensioners. The test income is work plus
//! retirement income, excluding the Old Age Security pension itself, less a
//! work exemption: the first `work_exemption_full` dollars of employment
//! income entirely, and `work_exemption_partial_rate` of the next
//! `work_exemption_partial` dollars.
//!
//! | Household | Maximum            | Reduction                                    |
//! |-----------|--------------------|----------------------------------------------|
//! | one adult | `single_maximum`   | `single_reduction_rate` × own income         |
//! | couple    | `couple_maximum` each eligible adult | `couple_reduction_rate` × combined income |

use rust_decimal::Decimal;

use crate::calculations::common::{excess, phase_out};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{Adult, AdultSplit, Household, ProgramId, TaxYearContext};

pub struct GuaranteedIncomeSupplement;

impl GuaranteedIncomeSupplement {
    fn test_income(
        adult: &Adult,
        context: &TaxYearContext,
    ) -> Result<Decimal, EngineError> {
        let program = ProgramId::GuaranteedIncomeSupplement;
        let full = context.amount(program, "work_exemption_full")?;
        let partial = context.amount(program, "work_exemption_partial")?;
        let partial_rate = context.amount(program, "work_exemption_partial_rate")?;

        let work = adult.work_income;
        let exemption = work.min(full) + partial_rate * excess(work, full).min(partial);

        Ok(adult.retirement_income + work - exemption)
    }
}

impl ProgramCalculator for GuaranteedIncomeSupplement {
    fn program(&self) -> ProgramId {
        ProgramId::GuaranteedIncomeSupplement
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "single_maximum",
            "couple_maximum",
            "single_reduction_rate",
            "couple_reduction_rate",
            "work_exemption_full",
            "work_exemption_partial",
            "work_exemption_partial_rate",
            "minimum_age",
        ]
    }

    fn pools_household_income(&self) -> bool {
        true
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let program = self.program();
        let minimum_age = context.amount(program, "minimum_age")?;
        let eligible = |adult: &Adult| Decimal::from(adult.age) >= minimum_age;

        if !household.is_couple() {
            if !eligible(&household.adult1) {
                return Ok(AdultSplit::ZERO);
            }
            let income = Self::test_income(&household.adult1, context)?;
            return Ok(AdultSplit::first(phase_out(
                context.amount(program, "single_maximum")?,
                context.amount(program, "single_reduction_rate")?,
                income,
                Decimal::ZERO,
            )));
        }

        let combined = AdultSplit::per_adult(household, |adult| Self::test_income(adult, context))?.total();
        let supplement = phase_out(
            context.amount(program, "couple_maximum")?,
            context.amount(program, "couple_reduction_rate")?,
            combined,
            Decimal::ZERO,
        );

        AdultSplit::per_adult(household, |adult| {
            Ok(if eligible(adult) { supplement } else { Decimal::ZERO })
        })
    }
}
