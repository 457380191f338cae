//! GST/HST credit.
//!
//! | Component             | Who receives it                                           |
//! |-----------------------|-----------------------------------------------------------|
//! | basic amount          | every household                                           |
//! | spouse amount         | couples; single parents for their first child            |
//! | child amount          | each other child, weighted by custody share              |
//! | single supplement     | one-adult households: in full with children, otherwise phased in on net income above a base |
//!
//! The sum is reduced above a family-income threshold. A lone adult under
//! the minimum age with no spouse or child is not eligible.

use rust_decimal::Decimal;

use crate::calculations::common::{excess, phase_out};
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct GstCredit;

impl ProgramCalculator for GstCredit {
    fn program(&self) -> ProgramId {
        ProgramId::GstCredit
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "basic_amount",
            "spouse_amount",
            "child_amount",
            "single_supplement_maximum",
            "single_supplement_base",
            "single_supplement_rate",
            "reduction_threshold",
            "reduction_rate",
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
        let couple = household.is_couple();
        let has_children = household.has_children();

        if !couple
            && !has_children
            && Decimal::from(household.adult1.age) < context.amount(program, "minimum_age")?
        {
            return Ok(AdultSplit::ZERO);
        }

        let income = family_net_income(household, prior)?;
        let spouse_amount = context.amount(program, "spouse_amount")?;
        let child_amount = context.amount(program, "child_amount")?;

        let mut credit = context.amount(program, "basic_amount")?;
        let mut children = household.children.iter();
        if couple {
            credit += spouse_amount;
        } else if let Some(first) = children.next() {
            credit += first.share() * spouse_amount;
        }
        credit += children.map(|child| child.share() * child_amount).sum::<Decimal>();

        if !couple {
            let supplement_maximum = context.amount(program, "single_supplement_maximum")?;
            credit += if has_children {
                supplement_maximum
            } else {
                let rate = context.amount(program, "single_supplement_rate")?;
                let base = context.amount(program, "single_supplement_base")?;
                (rate * excess(income, base)).min(supplement_maximum)
            };
        }

        let credit = phase_out(
            credit,
            context.amount(program, "reduction_rate")?,
            income,
            context.amount(program, "reduction_threshold")?,
        );

        Ok(AdultSplit::even(household, credit))
    }
}
