//! Canada child benefit.
//!
//! The maximum benefit depends on whether each child is under
//! `young_child_age_limit` and is weighted by the custody share. It is reduced in two phases on family net income, with
//! rates that rise with the number of children (one, two, three, four or
//! more):
//!
//! ```text
//! reduction = first_rate_n  × (min(income, second_threshold) − first_threshold)⁺
//!           + second_rate_n × (income − second_threshold)⁺
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{excess, max};
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

const FIRST_RATES: [&str; 4] = [
    "first_reduction_rate_1",
    "first_reduction_rate_2",
    "first_reduction_rate_3",
    "first_reduction_rate_4",
];
const SECOND_RATES: [&str; 4] = [
    "second_reduction_rate_1",
    "second_reduction_rate_2",
    "second_reduction_rate_3",
    "second_reduction_rate_4",
];

pub struct ChildBenefit;

impl ProgramCalculator for ChildBenefit {
    fn program(&self) -> ProgramId {
        ProgramId::ChildBenefit
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "maximum_under_6",
            "maximum_6_to_17",
            "young_child_age_limit",
            "first_threshold",
            "second_threshold",
            "first_reduction_rate_1",
            "first_reduction_rate_2",
            "first_reduction_rate_3",
            "first_reduction_rate_4",
            "second_reduction_rate_1",
            "second_reduction_rate_2",
            "second_reduction_rate_3",
            "second_reduction_rate_4",
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
        if !household.has_children() {
            return Ok(AdultSplit::ZERO);
        }

        let program = self.program();
        let under_6 = context.amount(program, "maximum_under_6")?;
        let from_6 = context.amount(program, "maximum_6_to_17")?;
        let age_limit = context.amount(program, "young_child_age_limit")?;
        let maximum: Decimal = household
            .children
            .iter()
            .map(|child| {
                let young = Decimal::from(child.age) < age_limit;
                child.share() * if young { under_6 } else { from_6 }
            })
            .sum();

        let index = household.children.len().min(4) - 1;
        let first_rate = context.amount(program, FIRST_RATES[index])?;
        let second_rate = context.amount(program, SECOND_RATES[index])?;
        let first_threshold = context.amount(program, "first_threshold")?;
        let second_threshold = context.amount(program, "second_threshold")?;

        let income = family_net_income(household, prior)?;
        let reduction = first_rate * excess(income.min(second_threshold), first_threshold)
            + second_rate * excess(income, second_threshold);

        Ok(AdultSplit::first(max(maximum - reduction, Decimal::ZERO)))
    }
}
