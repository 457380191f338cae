//! Senior assistance amount.
//!
//! A fixed amount for every adult who has reached the minimum age, phased
//! out on family income above a threshold that depends on whether the
//! household is a couple. The result is shared among the eligible adults.

use rust_decimal::Decimal;

use crate::calculations::common::phase_out;
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct SeniorAssistance;

impl ProgramCalculator for SeniorAssistance {
    fn program(&self) -> ProgramId {
        ProgramId::SeniorAssistance
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "amount_per_senior",
            "minimum_age",
            "threshold_single",
            "threshold_couple",
            "reduction_rate",
        ]
    }

    fn pools_household_income(&self) -> bool {
        true
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let program = self.program();
        let minimum_age = context.amount(program, "minimum_age")?;
        let eligible = AdultSplit::per_adult(household, |adult| {
            Ok::<_, EngineError>(if Decimal::from(adult.age) >= minimum_age {
                Decimal::ONE
            } else {
                Decimal::ZERO
            })
        })?;
        if eligible.total().is_zero() {
            return Ok(AdultSplit::ZERO);
        }

        let threshold = if household.is_couple() {
            context.amount(program, "threshold_couple")?
        } else {
            context.amount(program, "threshold_single")?
        };
        let amount = phase_out(
            eligible.total() * context.amount(program, "amount_per_senior")?,
            context.amount(program, "reduction_rate")?,
            family_net_income(household, prior)?,
            threshold,
        );

        Ok(AdultSplit::pro_rata(household, amount, eligible))
    }
}
