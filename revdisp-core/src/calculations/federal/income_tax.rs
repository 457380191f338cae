//! Federal personal income tax.
//!
//! Computed separately for each adult on net income (work + retirement +
//! Old Age Security). Non-refundable credits are valued at the credit rate:
//!
//! - basic personal amount, interpolated from its maximum down to its
//!   minimum between the two phase thresholds;
//! - age amount for adults at or above the minimum age, reduced above a
//!   net-income threshold;
//! - Canada employment amount, limited to work income;
//! - EI, QPIP and QPP contributions paid.
//!
//! The result is basic federal tax before the Quebec abatement.

use rust_decimal::Decimal;

use crate::calculations::common::{excess, max, phase_out, progressive};
use crate::calculations::income::{INCOME_TAX_INPUTS, contributions_paid, net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{Adult, AdultSplit, Household, ProgramId, TaxBracket, TaxYearContext};

pub struct FederalIncomeTax;

struct Parameters<'a> {
    schedule: &'a [TaxBracket],
    credit_rate: Decimal,
    bpa_maximum: Decimal,
    bpa_minimum: Decimal,
    bpa_phase_start: Decimal,
    bpa_phase_end: Decimal,
    age_amount: Decimal,
    age_amount_threshold: Decimal,
    age_amount_reduction_rate: Decimal,
    age_amount_minimum_age: Decimal,
    employment_amount: Decimal,
}

impl<'a> Parameters<'a> {
    fn read(context: &'a TaxYearContext) -> Result<Self, EngineError> {
        let p = ProgramId::FederalIncomeTax;
        Ok(Self {
            schedule: context.schedule(p, "tax_rates")?,
            credit_rate: context.amount(p, "credit_rate")?,
            bpa_maximum: context.amount(p, "basic_personal_amount_maximum")?,
            bpa_minimum: context.amount(p, "basic_personal_amount_minimum")?,
            bpa_phase_start: context.amount(p, "basic_personal_amount_phase_start")?,
            bpa_phase_end: context.amount(p, "basic_personal_amount_phase_end")?,
            age_amount: context.amount(p, "age_amount")?,
            age_amount_threshold: context.amount(p, "age_amount_threshold")?,
            age_amount_reduction_rate: context.amount(p, "age_amount_reduction_rate")?,
            age_amount_minimum_age: context.amount(p, "age_amount_minimum_age")?,
            employment_amount: context.amount(p, "employment_amount")?,
        })
    }

    fn basic_personal_amount(
        &self,
        net_income: Decimal,
    ) -> Decimal {
        let span = self.bpa_phase_end - self.bpa_phase_start;
        if span <= Decimal::ZERO {
            return self.bpa_maximum;
        }
        let progress = (excess(net_income, self.bpa_phase_start) / span).min(Decimal::ONE);
        self.bpa_maximum - (self.bpa_maximum - self.bpa_minimum) * progress
    }

    fn tax(
        &self,
        adult: &Adult,
        net_income: Decimal,
        contributions: Decimal,
    ) -> Decimal {
        let basic_tax = progressive(self.schedule, net_income);

        let age_amount = if Decimal::from(adult.age) >= self.age_amount_minimum_age {
            phase_out(
                self.age_amount,
                self.age_amount_reduction_rate,
                net_income,
                self.age_amount_threshold,
            )
        } else {
            Decimal::ZERO
        };

        let credit_base = self.basic_personal_amount(net_income)
            + age_amount
            + adult.work_income.min(self.employment_amount)
            + contributions;

        max(basic_tax - credit_base * self.credit_rate, Decimal::ZERO)
    }
}

impl ProgramCalculator for FederalIncomeTax {
    fn program(&self) -> ProgramId {
        ProgramId::FederalIncomeTax
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        INCOME_TAX_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "tax_rates",
            "credit_rate",
            "basic_personal_amount_maximum",
            "basic_personal_amount_minimum",
            "basic_personal_amount_phase_start",
            "basic_personal_amount_phase_end",
            "age_amount",
            "age_amount_threshold",
            "age_amount_reduction_rate",
            "age_amount_minimum_age",
            "employment_amount",
        ]
    }

    fn compute(
        &self,
        household: &Household,
        context: &TaxYearContext,
        prior: &PriorResults<'_>,
    ) -> Result<AdultSplit, EngineError> {
        let parameters = Parameters::read(context)?;
        let net = net_income(household, prior)?;
        let contributions = contributions_paid(prior)?;

        let adult1 = parameters.tax(&household.adult1, net.adult1, contributions.adult1);
        let adult2 = match &household.adult2 {
            Some(adult) => parameters.tax(adult, net.adult2, contributions.adult2),
            None => Decimal::ZERO,
        };

        Ok(AdultSplit::new(adult1, adult2))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::results;
    use crate::models::{HouseholdType, Jurisdiction, ProgramResult};

    const FED: ProgramId = ProgramId::FederalIncomeTax;

    fn context_2023() -> TaxYearContext {
        TaxYearContext::builder(2023, Jurisdiction::Federal)
            .bracket(FED, "tax_rates", dec!(0), Some(dec!(53359)), dec!(0.15))
            .bracket(FED, "tax_rates", dec!(53359), Some(dec!(106717)), dec!(0.205))
            .bracket(FED, "tax_rates", dec!(106717), Some(dec!(165430)), dec!(0.26))
            .bracket(FED, "tax_rates", dec!(165430), Some(dec!(235675)), dec!(0.29))
            .bracket(FED, "tax_rates", dec!(235675), None, dec!(0.33))
            .amount(FED, "credit_rate", dec!(0.15))
            .amount(FED, "basic_personal_amount_maximum", dec!(15000))
            .amount(FED, "basic_personal_amount_minimum", dec!(13520))
            .amount(FED, "basic_personal_amount_phase_start", dec!(165430))
            .amount(FED, "basic_personal_amount_phase_end", dec!(235675))
            .amount(FED, "age_amount", dec!(8396))
            .amount(FED, "age_amount_threshold", dec!(42335))
            .amount(FED, "age_amount_reduction_rate", dec!(0.15))
            .amount(FED, "age_amount_minimum_age", dec!(65))
            .amount(FED, "employment_amount", dec!(1368))
            .build()
            .unwrap()
    }

    fn contributions(
        ei: Decimal,
        qpip: Decimal,
        qpp: Decimal,
        oas: Decimal,
    ) -> BTreeMap<ProgramId, ProgramResult> {
        results(&[
            (ProgramId::EmploymentInsurance, ei, dec!(0)),
            (ProgramId::ParentalInsurance, qpip, dec!(0)),
            (ProgramId::QuebecPensionPlan, qpp, dec!(0)),
            (ProgramId::OldAgeSecurity, oas, dec!(0)),
        ])
    }

    fn tax(
        household: &Household,
        map: &BTreeMap<ProgramId, ProgramResult>,
    ) -> Decimal {
        let prior = PriorResults::new(FED, map, INCOME_TAX_INPUTS);
        FederalIncomeTax
            .compute(household, &context_2023(), &prior)
            .unwrap()
            .rounded()
            .total()
    }

    #[test]
    fn zero_income_pays_no_tax() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(0)), None);

        assert_eq!(tax(&household, &contributions(dec!(0), dec!(0), dec!(0), dec!(0))), dec!(0));
    }

    #[test]
    fn single_worker_at_30000_matches_hand_computation() {
        // 4500 − (15000 + 1368 + 2225.20) × 15 %
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(30000)), None);

        let result = tax(&household, &contributions(dec!(381), dec!(148.20), dec!(1696), dec!(0)));

        assert_eq!(result, dec!(1711.02));
    }

    #[test]
    fn basic_personal_amount_is_interpolated_between_thresholds() {
        let context = context_2023();
        let parameters = Parameters::read(&context).unwrap();

        assert_eq!(parameters.basic_personal_amount(dec!(100000)), dec!(15000));
        assert_eq!(parameters.basic_personal_amount(dec!(200552.5)), dec!(14260));
        assert_eq!(parameters.basic_personal_amount(dec!(500000)), dec!(13520));
    }

    #[test]
    fn pension_is_taxable_and_age_amount_applies() {
        // net 28354.52: tax 4253.178 − (15000 + 8396) × 15 % = 743.778
        let household = Household::new(HouseholdType::RetiredSingle, Adult::retiree(70, dec!(20000)), None);

        let result = tax(&household, &contributions(dec!(0), dec!(0), dec!(0), dec!(8354.52)));

        assert_eq!(result, dec!(743.78));
    }
}
