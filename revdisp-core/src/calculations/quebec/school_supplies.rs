//! Supplement for the purchase of school supplies.
//!
//! A fixed amount for every child of school age, weighted by custody share.

use rust_decimal::Decimal;

use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct SchoolSupplies;

impl ProgramCalculator for SchoolSupplies {
    fn program(&self) -> ProgramId {
        ProgramId::SchoolSupplies
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["amount_per_child", "minimum_age", "maximum_age"]
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let program = self.program();
        let amount = context.amount(program, "amount_per_child")?;
        let minimum_age = context.amount(program, "minimum_age")?;
        let maximum_age = context.amount(program, "maximum_age")?;

        let shares: Decimal = household
            .children
            .iter()
            .filter(|child| {
                let age = Decimal::from(child.age);
                age >= minimum_age && age <= maximum_age
            })
            .map(|child| child.share())
            .sum();

        Ok(AdultSplit::first(shares * amount))
    }
}
