//! Social assistance (last-resort financial assistance).
//!
//! A yearly base amount for a single adult or a couple, reduced dollar for
//! dollar by family work income above an exemption. Households whose adults
//! are all past `maximum_age` fall under the old-age programs instead.
//! Couples share the benefit evenly.

use rust_decimal::Decimal;

use crate::calculations::common::phase_out;
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct SocialAssistance;

impl ProgramCalculator for SocialAssistance {
    fn program(&self) -> ProgramId {
        ProgramId::SocialAssistance
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "base_single",
            "base_couple",
            "work_exemption_single",
            "work_exemption_couple",
            "reduction_rate",
            "maximum_age",
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
        let maximum_age = context.amount(program, "maximum_age")?;
        if household.adults().all(|adult| Decimal::from(adult.age) > maximum_age) {
            return Ok(AdultSplit::ZERO);
        }

        let (base, exemption) = if household.adult2.is_some() {
            (
                context.amount(program, "base_couple")?,
                context.amount(program, "work_exemption_couple")?,
            )
        } else {
            (
                context.amount(program, "base_single")?,
                context.amount(program, "work_exemption_single")?,
            )
        };
        let amount = phase_out(
            base,
            context.amount(program, "reduction_rate")?,
            household.work_income(),
            exemption,
        );

        Ok(AdultSplit::even(household, amount))
    }
}
