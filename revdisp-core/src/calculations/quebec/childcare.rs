//! Tax credit for childcare expenses.
//!
//! Only fees paid for non-subsidized care qualify. Each child's fees count up
//! to a limit that is higher for young children; the eligible total is
//! multiplied by a single rate read from a family-income rate table. Couples
//! share the credit in proportion to their net incomes.

use rust_decimal::Decimal;

use crate::calculations::common::rate_for;
use crate::calculations::income::{NET_INCOME_INPUTS, net_income};
use crate::calculations::{PriorResults, ProgramCalculator};
use crate::error::EngineError;
use crate::models::{AdultSplit, CareType, Household, ProgramId, TaxYearContext};

pub struct ChildcareCredit;

impl ProgramCalculator for ChildcareCredit {
    fn program(&self) -> ProgramId {
        ProgramId::ChildcareCredit
    }

    fn dependencies(&self) -> &'static [ProgramId] {
        NET_INCOME_INPUTS
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["credit_rates", "expense_limit_young", "expense_limit_other", "young_child_age_limit"]
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
        let limit_young = context.amount(program, "expense_limit_young")?;
        let limit_other = context.amount(program, "expense_limit_other")?;
        let young_age = context.amount(program, "young_child_age_limit")?;

        let eligible: Decimal = household
            .children
            .iter()
            .filter_map(|child| {
                let care = child.childcare.as_ref()?;
                if care.care_type != CareType::NonSubsidized {
                    return None;
                }
                let limit = if Decimal::from(child.age) < young_age { limit_young } else { limit_other };
                Some(care.fee.min(limit))
            })
            .sum();

        if eligible.is_zero() {
            return Ok(AdultSplit::ZERO);
        }

        let net = net_income(household, prior)?;
        let rates = context.schedule(program, "credit_rates")?;
        let rate = rate_for(rates, net.total()).ok_or_else(|| EngineError::InvalidParameter {
            year: context.year(),
            jurisdiction: context.jurisdiction(),
            program,
            parameter: "credit_rates".to_string(),
            reason: format!("no rate for family income {}", net.total()),
        })?;

        Ok(AdultSplit::pro_rata(household, eligible * rate, net))
    }
}
