//! Public prescription drug insurance premium.
//!
//! The premium is assessed on family net income above an exemption that
//! depends on the family situation:
//!
//! | Situation                     | Exemption parameter            |
//! |-------------------------------|--------------------------------|
//! | one adult, no child           | `exemption_single`             |
//! | one adult, one child          | `exemption_single_one_child`   |
//! | one adult, two or more        | `exemption_single_children`    |
//! | couple, no child              | `exemption_couple`             |
//! | couple, one child             | `exemption_couple_one_child`   |
//! | couple, two or more           | `exemption_couple_children`    |
//!
//! The excess is charged at a low rate on its first tier and a high rate
//! beyond. Couples use the couple rates and each spouse pays the result,
//! every adult being capped at the annual maximum premium.

use rust_decimal::Decimal;

use crate::calculations::common::excess;
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct DrugInsurance;

impl DrugInsurance {
    fn exemption_key(household: &Household) -> &'static str {
        let children = household.children.len();
        match (household.is_couple(), children) {
            (false, 0) => "exemption_single",
            (false, 1) => "exemption_single_one_child",
            (false, _) => "exemption_single_children",
            (true, 0) => "exemption_couple",
            (true, 1) => "exemption_couple_one_child",
            (true, _) => "exemption_couple_children",
        }
    }
}

impl ProgramCalculator for DrugInsurance {
    fn program(&self) -> ProgramId {
        ProgramId::DrugInsurance
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "maximum_premium",
            "first_tier",
            "exemption_single",
            "exemption_single_one_child",
            "exemption_single_children",
            "exemption_couple",
            "exemption_couple_one_child",
            "exemption_couple_children",
            "single_rate_low",
            "single_rate_high",
            "couple_rate_low",
            "couple_rate_high",
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
        let family_income = family_net_income(household, prior)?;
        let exemption = context.amount(program, Self::exemption_key(household))?;
        let first_tier = context.amount(program, "first_tier")?;
        let maximum = context.amount(program, "maximum_premium")?;

        let (low, high) = if household.is_couple() {
            (
                context.amount(program, "couple_rate_low")?,
                context.amount(program, "couple_rate_high")?,
            )
        } else {
            (
                context.amount(program, "single_rate_low")?,
                context.amount(program, "single_rate_high")?,
            )
        };

        let assessable = excess(family_income, exemption);
        let per_adult = (low * assessable.min(first_tier) + high * excess(assessable, first_tier))
            .min(maximum);

        Ok(if household.is_couple() {
            AdultSplit::new(per_adult, per_adult)
        } else {
            AdultSplit::first(per_adult)
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::results;
    use crate::models::{Adult, Child, HouseholdType, Jurisdiction};

    const RAMQ: ProgramId = ProgramId::DrugInsurance;

    fn context() -> TaxYearContext {
        TaxYearContext::builder(2024, Jurisdiction::Quebec)
            .amount(RAMQ, "maximum_premium", dec!(731))
            .amount(RAMQ, "first_tier", dec!(5000))
            .amount(RAMQ, "exemption_single", dec!(19790))
            .amount(RAMQ, "exemption_single_one_child", dec!(32080))
            .amount(RAMQ, "exemption_single_children", dec!(36185))
            .amount(RAMQ, "exemption_couple", dec!(32080))
            .amount(RAMQ, "exemption_couple_one_child", dec!(36185))
            .amount(RAMQ, "exemption_couple_children", dec!(39975))
            .amount(RAMQ, "single_rate_low", dec!(0.0747))
            .amount(RAMQ, "single_rate_high", dec!(0.1122))
            .amount(RAMQ, "couple_rate_low", dec!(0.0375))
            .amount(RAMQ, "couple_rate_high", dec!(0.0562))
            .build()
            .unwrap()
    }

    fn premium(household: &Household) -> AdultSplit {
        let map = results(&[(ProgramId::OldAgeSecurity, dec!(0), dec!(0))]);
        let prior = PriorResults::new(RAMQ, &map, NET_INCOME_INPUTS);
        DrugInsurance.compute(household, &context(), &prior).unwrap()
    }

    #[test]
    fn nothing_is_due_below_exemption() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(19000)), None);

        assert_eq!(premium(&household).total(), dec!(0));
    }

    #[test]
    fn single_pays_low_rate_on_first_tier() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(22790)), None);

        assert_eq!(premium(&household).total(), dec!(224.1000));
    }

    #[test]
    fn single_pays_high_rate_beyond_first_tier() {
        // 5000 × 7.47 % + 1000 × 11.22 %
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(25790)), None);

        assert_eq!(premium(&household).total(), dec!(485.7000));
    }

    #[test]
    fn premium_is_capped_at_maximum() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(90000)), None);

        assert_eq!(premium(&household).total(), dec!(731));
    }

    #[test]
    fn couple_exemption_depends_on_children() {
        let household = Household::new(
            HouseholdType::Couple,
            Adult::worker(35, dec!(20000)),
            Some(Adult::worker(35, dec!(20000))),
        )
        .with_children(vec![Child::new(3), Child::new(5)]);

        // (40000 − 39975) × 3.75 % for each spouse
        assert_eq!(premium(&household), AdultSplit::new(dec!(0.9375), dec!(0.9375)));
    }
}
