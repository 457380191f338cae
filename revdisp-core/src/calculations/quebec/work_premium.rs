//! Work premium.
//!
//! A phase-in on family work income above an excluded amount, capped at a
//! maximum and phased out on family net income. Parameters depend on the
//! household category:
//!
//! | Category               | Prefix                   |
//! |------------------------|--------------------------|
//! | one adult, no child    | `person_alone`           |
//! | couple, no child       | `couple_without_children`|
//! | one adult with child   | `single_parent`          |
//! | couple with child      | `couple_with_children`   |
//!
//! Each category defines `.excluded_income`, `.rate`, `.maximum` and
//! `.reduction_threshold`; the reduction rate is shared.

use crate::calculations::common::{excess, phase_out};
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income, work_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct WorkPremium;

impl WorkPremium {
    fn category(household: &Household) -> &'static str {
        match (household.is_couple(), household.has_children()) {
            (false, false) => "person_alone",
            (true, false) => "couple_without_children",
            (false, true) => "single_parent",
            (true, true) => "couple_with_children",
        }
    }
}

impl ProgramCalculator for WorkPremium {
    fn program(&self) -> ProgramId {
        ProgramId::WorkPremium
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "person_alone.excluded_income",
            "person_alone.rate",
            "person_alone.maximum",
            "person_alone.reduction_threshold",
            "couple_without_children.excluded_income",
            "couple_without_children.rate",
            "couple_without_children.maximum",
            "couple_without_children.reduction_threshold",
            "single_parent.excluded_income",
            "single_parent.rate",
            "single_parent.maximum",
            "single_parent.reduction_threshold",
            "couple_with_children.excluded_income",
            "couple_with_children.rate",
            "couple_with_children.maximum",
            "couple_with_children.reduction_threshold",
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
        let category = Self::category(household);
        let parameter = |name: &str| context.amount(program, &format!("{category}.{name}"));

        let work = work_income(household);
        let phase_in = (parameter("rate")? * excess(work.total(), parameter("excluded_income")?))
            .min(parameter("maximum")?);

        let premium = phase_out(
            phase_in,
            context.amount(program, "reduction_rate")?,
            family_net_income(household, prior)?,
            parameter("reduction_threshold")?,
        );

        Ok(AdultSplit::pro_rata(household, premium, work))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::results;
    use crate::models::{Adult, Child, HouseholdType, Jurisdiction};

    const WP: ProgramId = ProgramId::WorkPremium;

    fn context() -> TaxYearContext {
        let mut builder = TaxYearContext::builder(2024, Jurisdiction::Quebec).amount(WP, "reduction_rate", dec!(0.10));
        for (category, excluded, rate, maximum, threshold) in [
            ("person_alone", dec!(2400), dec!(0.116), dec!(1152.34), dec!(12334)),
            ("couple_without_children", dec!(3600), dec!(0.116), dec!(1797.07), dec!(19092)),
            ("single_parent", dec!(2400), dec!(0.30), dec!(2980.20), dec!(12334)),
            ("couple_with_children", dec!(3600), dec!(0.25), dec!(3873), dec!(19092)),
        ] {
            builder = builder
                .amount(WP, &format!("{category}.excluded_income"), excluded)
                .amount(WP, &format!("{category}.rate"), rate)
                .amount(WP, &format!("{category}.maximum"), maximum)
                .amount(WP, &format!("{category}.reduction_threshold"), threshold);
        }
        builder.build().unwrap()
    }

    fn premium(household: &Household) -> AdultSplit {
        let map = results(&[(ProgramId::OldAgeSecurity, dec!(0), dec!(0))]);
        let prior = PriorResults::new(WP, &map, NET_INCOME_INPUTS);
        WorkPremium.compute(household, &context(), &prior).unwrap()
    }

    fn single(work: Decimal) -> Household {
        Household::new(HouseholdType::Single, Adult::worker(30, work), None)
    }

    #[test]
    fn no_work_income_means_no_premium() {
        assert_eq!(premium(&single(dec!(0))), AdultSplit::ZERO);
    }

    #[test]
    fn premium_phases_in_above_excluded_income() {
        assert_eq!(premium(&single(dec!(7400))).total(), dec!(580.000));
    }

    #[test]
    fn premium_is_capped_then_phased_out() {
        // capped at 1152.34, reduced by 10 % of (14334 − 12334)
        assert_eq!(premium(&single(dec!(14334))).total(), dec!(952.34));
    }

    #[test]
    fn premium_disappears_at_high_income() {
        assert_eq!(premium(&single(dec!(40000))).total(), dec!(0));
    }

    #[test]
    fn single_parent_uses_higher_rate() {
        let household = Household::new(HouseholdType::SingleParent, Adult::worker(30, dec!(7400)), None)
            .with_children(vec![Child::new(6)]);

        assert_eq!(premium(&household).total(), dec!(1500.00));
    }

    #[test]
    fn couple_premium_follows_work_income() {
        let household = Household::new(
            HouseholdType::Couple,
            Adult::worker(35, dec!(6000)),
            Some(Adult::worker(35, dec!(2000))),
        )
        .with_children(vec![Child::new(6)]);

        // 0.25 × (8000 − 3600) = 1100, split 3 : 1
        assert_eq!(premium(&household), AdultSplit::new(dec!(825.00), dec!(275.00)));
    }
}
