//! Canada workers benefit.
//!
//! Working income above an excluded amount phases the benefit in up to a
//! maximum; family net income above a threshold phases it out. Families
//! (couples or single parents) use the `family.*` parameters, everyone else
//! the `single.*` ones. In couples, the lower earner's work income is
//! exempt from the phase-out up to the secondary earner exemption.

use rust_decimal::Decimal;

use crate::calculations::common::{excess, phase_out};
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income, work_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct WorkersBenefit;

impl ProgramCalculator for WorkersBenefit {
    fn program(&self) -> ProgramId {
        ProgramId::WorkersBenefit
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "single.maximum",
            "single.rate",
            "single.excluded_income",
            "single.reduction_threshold",
            "family.maximum",
            "family.rate",
            "family.excluded_income",
            "family.reduction_threshold",
            "reduction_rate",
            "secondary_earner_exemption",
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
        prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let program = self.program();
        let family = household.is_couple() || household.has_children();

        if !family && Decimal::from(household.adult1.age) < context.amount(program, "minimum_age")? {
            return Ok(AdultSplit::ZERO);
        }

        let prefix = if family { "family" } else { "single" };
        let parameter = |name: &str| context.amount(program, &format!("{prefix}.{name}"));

        let work = work_income(household);
        let phase_in = (parameter("rate")? * excess(work.total(), parameter("excluded_income")?))
            .min(parameter("maximum")?);

        let mut income = family_net_income(household, prior)?;
        if household.is_couple() {
            let secondary = work.adult1.min(work.adult2);
            income -= secondary.min(context.amount(program, "secondary_earner_exemption")?);
        }

        let benefit = phase_out(
            phase_in,
            context.amount(program, "reduction_rate")?,
            income,
            parameter("reduction_threshold")?,
        );

        Ok(AdultSplit::pro_rata(household, benefit, work))
    }
}
