//! Quebec family allowance.
//!
//! Each child attracts a maximum amount weighted by the household's custody
//! share, plus a supplement for single-parent families. The total is reduced
//! above a family-income threshold (one for couples, one for single parents)
//! but never below the sum of the per-child minimums.

use rust_decimal::Decimal;

use crate::calculations::common::{excess, max};
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, HouseholdType, ProgramId, TaxYearContext};

pub struct FamilyAllowance;

impl ProgramCalculator for FamilyAllowance {
    fn program(&self) -> ProgramId {
        ProgramId::FamilyAllowance
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "maximum_per_child",
            "minimum_per_child",
            "single_parent_maximum",
            "single_parent_minimum",
            "threshold_couple",
            "threshold_single_parent",
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
        if !household.has_children() {
            return Ok(AdultSplit::ZERO);
        }

        let program = self.program();
        let shares: Decimal = household.children.iter().map(|child| child.share()).sum();
        let single_parent = household.household_type == HouseholdType::SingleParent;

        let mut maximum = shares * context.amount(program, "maximum_per_child")?;
        let mut minimum = shares * context.amount(program, "minimum_per_child")?;
        if single_parent {
            maximum += context.amount(program, "single_parent_maximum")?;
            minimum += context.amount(program, "single_parent_minimum")?;
        }

        let threshold = if single_parent {
            context.amount(program, "threshold_single_parent")?
        } else {
            context.amount(program, "threshold_couple")?
        };
        let reduction = context.amount(program, "reduction_rate")?
            * excess(family_net_income(household, prior)?, threshold);

        Ok(AdultSplit::first(max(maximum - reduction, minimum)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::results;
    use crate::models::{Adult, Child, Custody, Jurisdiction};

    const FA: ProgramId = ProgramId::FamilyAllowance;

    fn context() -> TaxYearContext {
        TaxYearContext::builder(2024, Jurisdiction::Quebec)
            .amount(FA, "maximum_per_child", dec!(2923))
            .amount(FA, "minimum_per_child", dec!(1163))
            .amount(FA, "single_parent_maximum", dec!(1026))
            .amount(FA, "single_parent_minimum", dec!(409))
            .amount(FA, "threshold_couple", dec!(60730))
            .amount(FA, "threshold_single_parent", dec!(44266))
            .amount(FA, "reduction_rate", dec!(0.04))
            .build()
            .unwrap()
    }

    fn allowance(household: &Household) -> Decimal {
        let map = results(&[(ProgramId::OldAgeSecurity, dec!(0), dec!(0))]);
        let prior = PriorResults::new(FA, &map, NET_INCOME_INPUTS);
        FamilyAllowance.compute(household, &context(), &prior).unwrap().total()
    }

    fn couple(
        income: Decimal,
        children: Vec<Child>,
    ) -> Household {
        Household::new(
            HouseholdType::Couple,
            Adult::worker(35, income),
            Some(Adult::worker(35, dec!(0))),
        )
        .with_children(children)
    }

    #[test]
    fn zero_income_couple_receives_maximum() {
        let household = couple(dec!(0), vec![Child::new(3), Child::new(7)]);

        assert_eq!(allowance(&household), dec!(5846));
    }

    #[test]
    fn single_parent_receives_supplement() {
        let household = Household::new(HouseholdType::SingleParent, Adult::worker(30, dec!(0)), None)
            .with_children(vec![Child::new(3)]);

        assert_eq!(allowance(&household), dec!(3949));
    }

    #[test]
    fn allowance_is_reduced_above_threshold() {
        let household = couple(dec!(70730), vec![Child::new(3), Child::new(7)]);

        assert_eq!(allowance(&household), dec!(5446.00));
    }

    #[test]
    fn allowance_never_falls_below_minimum() {
        let household = couple(dec!(400000), vec![Child::new(3), Child::new(7)]);

        assert_eq!(allowance(&household), dec!(2326));
    }

    #[test]
    fn shared_custody_halves_the_child_amount() {
        let household = couple(dec!(0), vec![Child::new(10).with_custody(Custody::Shared)]);

        assert_eq!(allowance(&household), dec!(1461.5));
    }

    #[test]
    fn no_children_means_no_allowance() {
        let household = couple(dec!(0), vec![]);

        assert_eq!(allowance(&household), dec!(0));
    }
}
