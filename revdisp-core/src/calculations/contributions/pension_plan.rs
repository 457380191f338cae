//! Quebec Pension Plan employee contribution.
//!
//! The contribution is a bracket schedule on work income: a basic exemption
//! band at 0 %, the base rate up to the maximum pensionable earnings, and the
//! second additional rate up to the additional ceiling. Years before the
//! second additional contribution simply carry a 0 % band there.

use crate::calculations::common::progressive;
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct QuebecPensionPlan;

impl ProgramCalculator for QuebecPensionPlan {
    fn program(&self) -> ProgramId {
        ProgramId::QuebecPensionPlan
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["contribution_rates"]
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let schedule = context.schedule(self.program(), "contribution_rates")?;

        AdultSplit::per_adult(household, |adult| Ok(progressive(schedule, adult.work_income)))
    }
}
