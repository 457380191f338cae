//! Health Services Fund contribution on non-employment income.
//!
//! | Retirement income                    | Contribution                                  |
//! |--------------------------------------|-----------------------------------------------|
//! | up to the first threshold            | 0                                             |
//! | up to the second threshold           | rate × excess over first, at most the base cap |
//! | above the second threshold           | base cap + rate × excess over second, at most the maximum |

use rust_decimal::Decimal;

use crate::calculations::common::excess;
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct HealthServicesFund;

impl ProgramCalculator for HealthServicesFund {
    fn program(&self) -> ProgramId {
        ProgramId::HealthServicesFund
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["first_threshold", "second_threshold", "rate", "base_maximum", "maximum"]
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let program = self.program();
        let schedule = Schedule {
            first_threshold: context.amount(program, "first_threshold")?,
            second_threshold: context.amount(program, "second_threshold")?,
            rate: context.amount(program, "rate")?,
            base_maximum: context.amount(program, "base_maximum")?,
            maximum: context.amount(program, "maximum")?,
        };

        AdultSplit::per_adult(household, |adult| Ok(schedule.contribution(adult.retirement_income)))
    }
}

struct Schedule {
    first_threshold: Decimal,
    second_threshold: Decimal,
    rate: Decimal,
    base_maximum: Decimal,
    maximum: Decimal,
}

impl Schedule {
    fn contribution(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.first_threshold {
            Decimal::ZERO
        } else if income <= self.second_threshold {
            (self.rate * excess(income, self.first_threshold)).min(self.base_maximum)
        } else {
            (self.base_maximum + self.rate * excess(income, self.second_threshold)).min(self.maximum)
        }
    }
}
