//! Refundable Quebec abatement.
//!
//! Quebec residents receive a fixed percentage of their basic federal tax
//! back, because Quebec funds programs that are federal elsewhere.

use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct QuebecAbatement;

impl ProgramCalculator for QuebecAbatement {
    fn program(&self) -> ProgramId {
        ProgramId::QuebecAbatement
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        &[ProgramId::FederalIncomeTax]
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["rate"]
    }

    fn compute(
        &self,
        _household: &Household,
        context: &TaxYearContext,
        prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let rate = context.amount(self.program(), "rate")?;
        let federal_tax = prior.split(ProgramId::FederalIncomeTax)?;

        Ok(AdultSplit::new(federal_tax.adult1 * rate, federal_tax.adult2 * rate))
    }
}
