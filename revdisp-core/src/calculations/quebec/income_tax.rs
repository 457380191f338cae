//! Quebec personal income tax.
//!
//! Computed separately for each adult:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Net income (work + retirement + Old Age Security) |
//! | 2    | Deduction for workers: rate × work income, capped |
//! | 3    | Taxable income (Step 1 − Step 2, minimum 0) |
//! | 4    | Tax from the progressive schedule |
//! | 5    | Age amount (65+) and retirement income amount, reduced by the reduction rate above the threshold |
//! | 6    | Living-alone amount or single-parent supplement (first adult of a one-adult household) |
//! | 7    | Contributions paid (EI, QPIP, QPP) |
//! | 8    | Credits: (basic personal amount + Step 5 + Step 6 + Step 7) × credit rate |
//! | 9    | Tax payable: Step 4 − Step 8, minimum 0 |

use rust_decimal::Decimal;

use crate::calculations::common::{excess, max, progressive};
use crate::calculations::income::{INCOME_TAX_INPUTS, contributions_paid, net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{Adult, AdultSplit, Household, HouseholdType, ProgramId, TaxYearContext};

pub struct QuebecIncomeTax;

/// Parameters of one year, read once per household.
struct Parameters<'a> {
    schedule: &'a [crate::models::TaxBracket],
    credit_rate: Decimal,
    basic_personal_amount: Decimal,
    worker_deduction_rate: Decimal,
    worker_deduction_maximum: Decimal,
    age_amount: Decimal,
    retirement_income_amount: Decimal,
    age_amount_minimum_age: Decimal,
    credit_reduction_threshold: Decimal,
    credit_reduction_rate: Decimal,
    living_alone_amount: Decimal,
    single_parent_supplement: Decimal,
}

impl<'a> Parameters<'a> {
    fn read(context: &'a TaxYearContext) -> Result<Self, EngineError> {
        let p = ProgramId::QuebecIncomeTax;
        Ok(Self {
            schedule: context.schedule(p, "tax_rates")?,
            credit_rate: context.amount(p, "credit_rate")?,
            basic_personal_amount: context.amount(p, "basic_personal_amount")?,
            worker_deduction_rate: context.amount(p, "worker_deduction_rate")?,
            worker_deduction_maximum: context.amount(p, "worker_deduction_maximum")?,
            age_amount: context.amount(p, "age_amount")?,
            retirement_income_amount: context.amount(p, "retirement_income_amount")?,
            age_amount_minimum_age: context.amount(p, "age_amount_minimum_age")?,
            credit_reduction_threshold: context.amount(p, "credit_reduction_threshold")?,
            credit_reduction_rate: context.amount(p, "credit_reduction_rate")?,
            living_alone_amount: context.amount(p, "living_alone_amount")?,
            single_parent_supplement: context.amount(p, "single_parent_supplement")?,
        })
    }

    fn tax(
        &self,
        adult: &Adult,
        net_income: Decimal,
        household_amount: Decimal,
        contributions: Decimal,
    ) -> Decimal {
        let deduction = (self.worker_deduction_rate * adult.work_income).min(self.worker_deduction_maximum);
        let taxable = max(net_income - deduction, Decimal::ZERO);
        let basic_tax = progressive(self.schedule, taxable);

        let credit_base = self.basic_personal_amount
            + self.age_related_amounts(adult, net_income)
            + household_amount
            + contributions;

        max(basic_tax - credit_base * self.credit_rate, Decimal::ZERO)
    }

    fn age_related_amounts(
        &self,
        adult: &Adult,
        net_income: Decimal,
    ) -> Decimal {
        if Decimal::from(adult.age) < self.age_amount_minimum_age {
            return Decimal::ZERO;
        }
        let amounts = self.age_amount + adult.retirement_income.min(self.retirement_income_amount);
        let reduction = self.credit_reduction_rate * excess(net_income, self.credit_reduction_threshold);
        max(amounts - reduction, Decimal::ZERO)
    }

    fn household_amount(
        &self,
        household: &Household,
    ) -> Decimal {
        match household.household_type {
            HouseholdType::Single | HouseholdType::RetiredSingle => self.living_alone_amount,
            HouseholdType::SingleParent => self.living_alone_amount + self.single_parent_supplement,
            HouseholdType::Couple | HouseholdType::RetiredCouple => Decimal::ZERO,
        }
    }
}

impl ProgramCalculator for QuebecIncomeTax {
    fn program(&self) -> ProgramId {
        ProgramId::QuebecIncomeTax
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        INCOME_TAX_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &[
            "tax_rates",
            "credit_rate",
            "basic_personal_amount",
            "worker_deduction_rate",
            "worker_deduction_maximum",
            "age_amount",
            "retirement_income_amount",
            "age_amount_minimum_age",
            "credit_reduction_threshold",
            "credit_reduction_rate",
            "living_alone_amount",
            "single_parent_supplement",
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

        let adult1 = parameters.tax(
            &household.adult1,
            net.adult1,
            parameters.household_amount(household),
            contributions.adult1,
        );
        let adult2 = match &household.adult2 {
            Some(adult) => parameters.tax(adult, net.adult2, Decimal::ZERO, contributions.adult2),
            None => Decimal::ZERO,
        };

        Ok(AdultSplit::new(adult1, adult2))
    }
}
