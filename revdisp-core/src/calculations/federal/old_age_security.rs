//! Old Age Security pension.
//!
//! Paid to each adult from the minimum age, at a higher rate from the senior
//! age. The recovery tax claws back `recovery_rate` of the adult's income
//! (pension included) above `recovery_threshold`, up to the full pension.
//! The result is the pension actually kept.

use rust_decimal::Decimal;

use crate::calculations::common::excess;
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{Adult, AdultSplit, Household, ProgramId, TaxYearContext};

pub struct OldAgeSecurity;

impl OldAgeSecurity {
    fn pension(
        adult: &Adult,
        context: &TaxYearContext,
    ) -> Result<Decimal, EngineError> {
        let program = ProgramId::OldAgeSecurity;
        let age = Decimal::from(adult.age);
        if age < context.amount(program, "minimum_age")? {
            return Ok(Decimal::ZERO);
        }

        let pension = if age >= context.amount(program, "senior_age")? {
            context.amount(program, "pension_75_and_over")?
        } else {
            context.amount(program, "pension_65_to_74")?
        };

        let recovery = context.amount(program, "recovery_rate")?
            * excess(
                adult.gross_income() + pension,
                context.amount(program, "recovery_threshold")?,
            );

        Ok(pension - recovery.min(pension))
    }
}

impl ProgramCalculator for OldAgeSecurity {
    fn program(&self) -> ProgramId {
        ProgramId::OldAgeSecurity
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "pension_65_to_74",
            "pension_75_and_over",
            "minimum_age",
            "senior_age",
            "recovery_threshold",
            "recovery_rate",
        ]
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        AdultSplit::per_adult(household, |adult| Self::pension(adult, context))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{HouseholdType, Jurisdiction};

    const OAS: ProgramId = ProgramId::OldAgeSecurity;

    fn pension(household: &Household) -> AdultSplit {
        let context = TaxYearContext::builder(2024, Jurisdiction::Federal)
            .amount(OAS, "pension_65_to_74", dec!(8618.04))
            .amount(OAS, "pension_75_and_over", dec!(9479.88))
            .amount(OAS, "minimum_age", dec!(65))
            .amount(OAS, "senior_age", dec!(75))
            .amount(OAS, "recovery_threshold", dec!(90997))
            .amount(OAS, "recovery_rate", dec!(0.15))
            .build()
            .unwrap();
        let map = BTreeMap::new();
        let prior = PriorResults::new(OAS, &map, &[]);
        OldAgeSecurity.compute(household, &context, &prior).unwrap()
    }

    #[test]
    fn pension_depends_on_age_band() {
        let household = Household::new(
            HouseholdType::RetiredCouple,
            Adult::retiree(70, dec!(20000)),
            Some(Adult::retiree(80, dec!(5000))),
        );

        assert_eq!(pension(&household), AdultSplit::new(dec!(8618.04), dec!(9479.88)));
    }

    #[test]
    fn workers_under_minimum_age_receive_nothing() {
        let household = Household::new(HouseholdType::Single, Adult::worker(64, dec!(0)), None);

        assert_eq!(pension(&household), AdultSplit::ZERO);
    }

    #[test]
    fn recovery_tax_reduces_pension() {
        let household = Household::new(HouseholdType::RetiredSingle, Adult::retiree(70, dec!(92378.96)), None);

        // income with pension exceeds the threshold by 10000
        assert_eq!(pension(&household).adult1, dec!(7118.04));
    }

    #[test]
    fn recovery_never_exceeds_pension() {
        let household = Household::new(HouseholdType::RetiredSingle, Adult::retiree(70, dec!(250000)), None);

        assert_eq!(pension(&household), AdultSplit::ZERO);
    }
}
