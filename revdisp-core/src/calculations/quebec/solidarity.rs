//! Solidarity tax credit.
//!
//! Two components are added and then phased out together on family income:
//!
//! - the QST component: a base amount, an amount for a spouse, and a
//!   supplement for a person living alone;
//! - the housing component: an amount for a couple or a single adult, plus a
//!   supplement per child weighted by custody share.
//!
//! Couples split the credit evenly.

use rust_decimal::Decimal;

use crate::calculations::common::phase_out;
use crate::calculations::income::{NET_INCOME_INPUTS, family_net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

pub struct SolidarityCredit;

impl ProgramCalculator for SolidarityCredit {
    fn program(&self) -> ProgramId {
        ProgramId::SolidarityCredit
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "qst_base",
            "qst_spouse",
            "qst_living_alone",
            "housing_single",
            "housing_couple",
            "housing_per_child",
            "reduction_threshold",
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
        let couple = household.is_couple();

        let mut qst = context.amount(program, "qst_base")?;
        if couple {
            qst += context.amount(program, "qst_spouse")?;
        }
        if household.household_type.lives_alone() {
            qst += context.amount(program, "qst_living_alone")?;
        }

        let shares: Decimal = household.children.iter().map(|child| child.share()).sum();
        let adults_housing = if couple {
            context.amount(program, "housing_couple")?
        } else {
            context.amount(program, "housing_single")?
        };
        let housing = adults_housing + shares * context.amount(program, "housing_per_child")?;

        let credit = phase_out(
            qst + housing,
            context.amount(program, "reduction_rate")?,
            family_net_income(household, prior)?,
            context.amount(program, "reduction_threshold")?,
        );

        Ok(AdultSplit::even(household, credit))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::results;
    use crate::models::{Adult, Child, Custody, HouseholdType, Jurisdiction};

    const SOL: ProgramId = ProgramId::SolidarityCredit;

    fn credit(household: &Household) -> AdultSplit {
        let context = TaxYearContext::builder(2024, Jurisdiction::Quebec)
            .amount(SOL, "qst_base", dec!(346))
            .amount(SOL, "qst_spouse", dec!(346))
            .amount(SOL, "qst_living_alone", dec!(164))
            .amount(SOL, "housing_single", dec!(711))
            .amount(SOL, "housing_couple", dec!(863))
            .amount(SOL, "housing_per_child", dec!(151))
            .amount(SOL, "reduction_threshold", dec!(41150))
            .amount(SOL, "reduction_rate", dec!(0.06))
            .build()
            .unwrap();
        let map = results(&[(ProgramId::OldAgeSecurity, dec!(0), dec!(0))]);
        let prior = PriorResults::new(SOL, &map, NET_INCOME_INPUTS);
        SolidarityCredit.compute(household, &context, &prior).unwrap()
    }

    #[test]
    fn person_living_alone_receives_supplement() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(0)), None);

        assert_eq!(credit(&household).total(), dec!(1221));
    }

    #[test]
    fn couple_with_children_splits_credit_evenly() {
        let household = Household::new(
            HouseholdType::Couple,
            Adult::worker(35, dec!(0)),
            Some(Adult::worker(35, dec!(0))),
        )
        .with_children(vec![Child::new(3), Child::new(9).with_custody(Custody::Shared)]);

        // 346 + 346 + 863 + 1.5 × 151
        assert_eq!(credit(&household), AdultSplit::new(dec!(890.75), dec!(890.75)));
    }

    #[test]
    fn credit_is_phased_out_above_threshold() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(51150)), None);

        assert_eq!(credit(&household).total(), dec!(621.00));
    }

    #[test]
    fn credit_never_goes_negative() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(150000)), None);

        assert_eq!(credit(&household).total(), dec!(0));
    }
}
