//! Income measures shared by several calculators.
//!
//! Net income, per adult, is work income plus retirement income plus the Old
//! Age Security pension actually received (after its recovery tax). Programs
//! that test family income read it through [`family_net_income`] and must
//! list [`NET_INCOME_INPUTS`] among their dependencies.

use rust_decimal::Decimal;

use super::PriorResults;
use crate::error::EngineError;
use crate::models::{AdultSplit, Household, ProgramId};

/// Results needed to compute net income.
pub const NET_INCOME_INPUTS: &[ProgramId] = &[ProgramId::OldAgeSecurity];

/// Results needed by the income tax calculators: net income plus the
/// contributions that earn non-refundable credits.
pub const INCOME_TAX_INPUTS: &[ProgramId] = &[
    ProgramId::EmploymentInsurance,
    ProgramId::ParentalInsurance,
    ProgramId::QuebecPensionPlan,
    ProgramId::OldAgeSecurity,
];

pub fn work_income(household: &Household) -> AdultSplit {
    AdultSplit::new(
        household.adult1.work_income,
        household.adult2.as_ref().map_or(Decimal::ZERO, |a| a.work_income),
    )
}

pub fn retirement_income(household: &Household) -> AdultSplit {
    AdultSplit::new(
        household.adult1.retirement_income,
        household
            .adult2
            .as_ref()
            .map_or(Decimal::ZERO, |a| a.retirement_income),
    )
}

/// Gross income plus the Old Age Security pension, per adult.
pub fn net_income(
    household: &Household,
    prior: &PriorResults<'_>,
) -> Result<AdultSplit, EngineError> {
    let pension = prior.split(ProgramId::OldAgeSecurity)?;
    Ok(work_income(household) + retirement_income(household) + pension)
}

pub fn family_net_income(
    household: &Household,
    prior: &PriorResults<'_>,
) -> Result<Decimal, EngineError> {
    net_income(household, prior).map(|split| split.total())
}

/// Employment insurance, parental insurance and pension plan contributions
/// paid by each adult.
pub fn contributions_paid(prior: &PriorResults<'_>) -> Result<AdultSplit, EngineError> {
    Ok(prior.split(ProgramId::EmploymentInsurance)?
        + prior.split(ProgramId::ParentalInsurance)?
        + prior.split(ProgramId::QuebecPensionPlan)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::results;
    use crate::models::{Adult, HouseholdType};

    #[test]
    fn net_income_adds_pension_to_gross_income() {
        let household = Household::new(
            HouseholdType::RetiredCouple,
            Adult::retiree(70, dec!(20000)),
            Some(Adult::retiree(66, dec!(5000))),
        );
        let map = results(&[(ProgramId::OldAgeSecurity, dec!(8618.04), dec!(8618.04))]);
        let prior = PriorResults::new(ProgramId::GstCredit, &map, NET_INCOME_INPUTS);

        let net = net_income(&household, &prior).unwrap();

        assert_eq!(net, AdultSplit::new(dec!(28618.04), dec!(13618.04)));
        assert_eq!(family_net_income(&household, &prior), Ok(dec!(42236.08)));
    }

    #[test]
    fn contributions_paid_sums_three_programs() {
        let map = results(&[
            (ProgramId::EmploymentInsurance, dec!(381), dec!(0)),
            (ProgramId::ParentalInsurance, dec!(148.20), dec!(0)),
            (ProgramId::QuebecPensionPlan, dec!(1696), dec!(0)),
            (ProgramId::OldAgeSecurity, dec!(0), dec!(0)),
        ]);
        let prior = PriorResults::new(ProgramId::QuebecIncomeTax, &map, INCOME_TAX_INPUTS);

        assert_eq!(contributions_paid(&prior), Ok(AdultSplit::first(dec!(2225.20))));
    }
}
