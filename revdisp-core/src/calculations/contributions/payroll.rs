//! Employment Insurance and Quebec Parental Insurance Plan premiums.
//!
//! Both are flat-rate premiums on work income up to a maximum insurable
//! amount. Earnings at or below the minimum insurable amount pay nothing;
//! above it the whole of the insurable earnings is charged:
//!
//! ```text
//! premium = 0                                   if work ≤ minimum
//!         = rate × min(work, maximum insurable) otherwise
//! ```
//!
//! Employment Insurance uses the reduced Quebec rate because parental
//! benefits are paid by the Quebec plan.

use rust_decimal::Decimal;

use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId, TaxYearContext};

const PARAMETERS: &[&str] = &["rate", "max_insurable_earnings", "min_insurable_earnings"];

pub struct EmploymentInsurance;

impl ProgramCalculator for EmploymentInsurance {
    fn program(&self) -> ProgramId {
        ProgramId::EmploymentInsurance
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        PARAMETERS
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        insurable_premium(household, context, self.program())
    }
}

pub struct ParentalInsurance;

impl ProgramCalculator for ParentalInsurance {
    fn program(&self) -> ProgramId {
        ProgramId::ParentalInsurance
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        PARAMETERS
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        _prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        insurable_premium(household, context, self.program())
    }
}

fn insurable_premium(
    household: &Household,
    context: &TaxYearContext,
    program: ProgramId,
) -> Result<AdultSplit, EngineError> {
    let rate = context.amount(program, "rate")?;
    let maximum = context.amount(program, "max_insurable_earnings")?;
    let minimum = context.amount(program, "min_insurable_earnings")?;

    AdultSplit::per_adult(household, |adult| {
        Ok(premium(adult.work_income, rate, maximum, minimum))
    })
}

fn premium(
    work_income: Decimal,
    rate: Decimal,
    maximum: Decimal,
    minimum: Decimal,
) -> Decimal {
    if work_income <= minimum {
        Decimal::ZERO
    } else {
        rate * work_income.min(maximum)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Adult, HouseholdType, Jurisdiction};

    fn ei_context() -> TaxYearContext {
        TaxYearContext::builder(2024, Jurisdiction::Federal)
            .amount(ProgramId::EmploymentInsurance, "rate", dec!(0.0132))
            .amount(ProgramId::EmploymentInsurance, "max_insurable_earnings", dec!(63200))
            .amount(ProgramId::EmploymentInsurance, "min_insurable_earnings", dec!(2000))
            .build()
            .unwrap()
    }

    fn qpip_context() -> TaxYearContext {
        TaxYearContext::builder(2024, Jurisdiction::Quebec)
            .amount(ProgramId::ParentalInsurance, "rate", dec!(0.00494))
            .amount(ProgramId::ParentalInsurance, "max_insurable_earnings", dec!(94000))
            .amount(ProgramId::ParentalInsurance, "min_insurable_earnings", dec!(2000))
            .build()
            .unwrap()
    }

    fn single(work_income: Decimal) -> Household {
        Household::new(HouseholdType::Single, Adult::worker(30, work_income), None)
    }

    fn compute(
        calculator: &dyn ProgramCalculator,
        context: &TaxYearContext,
        household: &Household,
    ) -> AdultSplit {
        let results = BTreeMap::new();
        let prior = PriorResults::new(calculator.program(), &results, &[]);
        calculator.compute(household, context, &prior).unwrap()
    }

    // =========================================================================
    // Employment Insurance
    // =========================================================================

    #[test]
    fn ei_charges_rate_on_earnings() {
        let split = compute(&EmploymentInsurance, &ei_context(), &single(dec!(30000)));

        assert_eq!(split.total(), dec!(396.0000));
    }

    #[test]
    fn ei_is_capped_at_maximum_insurable_earnings() {
        let split = compute(&EmploymentInsurance, &ei_context(), &single(dec!(150000)));

        assert_eq!(split.total(), dec!(834.24));
    }

    #[test]
    fn ei_is_zero_at_minimum_earnings() {
        let split = compute(&EmploymentInsurance, &ei_context(), &single(dec!(2000)));

        assert_eq!(split.total(), dec!(0));
    }

    #[test]
    fn ei_is_computed_per_adult() {
        let household = Household::new(
            HouseholdType::Couple,
            Adult::worker(40, dec!(100000)),
            Some(Adult::worker(40, dec!(10000))),
        );

        let split = compute(&EmploymentInsurance, &ei_context(), &household);

        assert_eq!(split, AdultSplit::new(dec!(834.24), dec!(132)));
    }

    // =========================================================================
    // Quebec Parental Insurance Plan
    // =========================================================================

    #[test]
    fn qpip_charges_rate_on_earnings() {
        let split = compute(&ParentalInsurance, &qpip_context(), &single(dec!(30000)));

        assert_eq!(split.total(), dec!(148.20));
    }

    #[test]
    fn qpip_is_zero_below_minimum_earnings() {
        let split = compute(&ParentalInsurance, &qpip_context(), &single(dec!(1500)));

        assert_eq!(split.total(), dec!(0));
    }

    #[test]
    fn qpip_ignores_retirement_income() {
        let household = Household::new(HouseholdType::RetiredSingle, Adult::retiree(70, dec!(40000)), None);

        let split = compute(&ParentalInsurance, &qpip_context(), &household);

        assert_eq!(split.total(), dec!(0));
    }

    #[test]
    fn missing_rate_is_an_error() {
        let context = TaxYearContext::builder(2024, Jurisdiction::Quebec).build().unwrap();
        let results = BTreeMap::new();
        let prior = PriorResults::new(ProgramId::ParentalInsurance, &results, &[]);

        let err = ParentalInsurance
            .compute(&single(dec!(30000)), &context, &prior)
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidParameter { .. }));
    }
}
