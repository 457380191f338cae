//! Result records produced by one evaluation.
//!
//! Every amount is stored as a non-negative magnitude. Whether it lowers or
//! raises disposable income is decided by the program's
//! [`ProgramKind`](super::ProgramKind):
//!
//! ```text
//! disposable = gross
//!            - taxes(QC) - taxes(CA)
//!            - contributions
//!            + transfers(QC) + transfers(CA)
//! ```

use std::collections::BTreeMap;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Household, Jurisdiction, ProgramId, ProgramKind};
use crate::calculations::common::round_half_up;

pub const GROSS_INCOME_FIELD: &str = "gross_income";
pub const QUEBEC_TOTAL_FIELD: &str = "quebec_total";
pub const FEDERAL_TOTAL_FIELD: &str = "federal_total";
pub const CONTRIBUTIONS_TOTAL_FIELD: &str = "contributions_total";
pub const DISPOSABLE_INCOME_FIELD: &str = "disposable_income";

/// A program amount broken down by adult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdultSplit {
    pub adult1: Decimal,
    pub adult2: Decimal,
}

impl AdultSplit {
    pub const ZERO: AdultSplit = AdultSplit {
        adult1: Decimal::ZERO,
        adult2: Decimal::ZERO,
    };

    pub fn new(
        adult1: Decimal,
        adult2: Decimal,
    ) -> Self {
        Self { adult1, adult2 }
    }

    /// The whole amount goes to the first adult.
    pub fn first(amount: Decimal) -> Self {
        Self::new(amount, Decimal::ZERO)
    }

    /// Splits a household amount evenly in couples; otherwise assigns it to
    /// the only adult.
    pub fn even(
        household: &Household,
        amount: Decimal,
    ) -> Self {
        if household.adult2.is_some() {
            let half = round_half_up(amount / Decimal::TWO);
            Self::new(half, amount - half)
        } else {
            Self::first(amount)
        }
    }

    /// Splits `amount` in proportion to `weights`, falling back to an even
    /// split when both weights are zero.
    pub fn pro_rata(
        household: &Household,
        amount: Decimal,
        weights: AdultSplit,
    ) -> Self {
        let total = weights.total();
        if household.adult2.is_none() {
            Self::first(amount)
        } else if total.is_zero() {
            Self::even(household, amount)
        } else {
            let first = round_half_up(amount * weights.adult1 / total);
            Self::new(first, amount - first)
        }
    }

    /// Computes an amount for each adult present.
    pub fn per_adult<F, E>(
        household: &Household,
        mut compute: F,
    ) -> Result<Self, E>
    where
        F: FnMut(&super::Adult) -> Result<Decimal, E>,
    {
        let adult1 = compute(&household.adult1)?;
        let adult2 = match &household.adult2 {
            Some(adult) => compute(adult)?,
            None => Decimal::ZERO,
        };
        Ok(Self::new(adult1, adult2))
    }

    pub fn total(&self) -> Decimal {
        self.adult1 + self.adult2
    }

    /// Rounds each adult's share to cents.
    pub fn rounded(&self) -> Self {
        Self::new(round_half_up(self.adult1), round_half_up(self.adult2))
    }

    /// Returns the share of the adult at `index` (0 or 1).
    pub fn get(
        &self,
        index: usize,
    ) -> Decimal {
        if index == 0 { self.adult1 } else { self.adult2 }
    }
}

impl Add for AdultSplit {
    type Output = AdultSplit;

    fn add(
        self,
        rhs: AdultSplit,
    ) -> AdultSplit {
        AdultSplit::new(self.adult1 + rhs.adult1, self.adult2 + rhs.adult2)
    }
}

/// The computed amount of one program for one household and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramResult {
    pub program: ProgramId,
    pub year: i32,
    pub household: String,
    pub split: AdultSplit,
    pub total: Decimal,
}

impl ProgramResult {
    /// Rounds `split` to cents and derives the total from the rounded shares.
    pub fn new(
        program: ProgramId,
        year: i32,
        household: &str,
        split: AdultSplit,
    ) -> Self {
        let split = split.rounded();
        Self {
            program,
            year,
            household: household.to_string(),
            split,
            total: split.total(),
        }
    }
}

/// Taxes, transfers and their net for one jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JurisdictionTotals {
    pub taxes: Decimal,
    pub transfers: Decimal,
}

impl JurisdictionTotals {
    /// Transfers minus taxes; negative when the household is a net payer.
    pub fn net(&self) -> Decimal {
        self.transfers - self.taxes
    }
}

/// The full outcome of evaluating one household for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposableIncomeResult {
    pub household: String,
    pub year: i32,
    pub gross_income: Decimal,
    pub programs: BTreeMap<ProgramId, ProgramResult>,
    pub quebec: JurisdictionTotals,
    pub federal: JurisdictionTotals,
    pub contributions: Decimal,
    pub disposable_income: Decimal,
}

impl DisposableIncomeResult {
    /// Assembles the totals from the program results.
    pub fn from_programs(
        household: &str,
        year: i32,
        gross_income: Decimal,
        programs: BTreeMap<ProgramId, ProgramResult>,
    ) -> Self {
        let mut quebec = JurisdictionTotals::default();
        let mut federal = JurisdictionTotals::default();
        let mut contributions = Decimal::ZERO;

        for result in programs.values() {
            let totals = match result.program.jurisdiction() {
                Jurisdiction::Quebec => &mut quebec,
                Jurisdiction::Federal => &mut federal,
            };
            match result.program.kind() {
                ProgramKind::Contribution => contributions += result.total,
                ProgramKind::Tax => totals.taxes += result.total,
                ProgramKind::Transfer => totals.transfers += result.total,
            }
        }

        let disposable_income = gross_income + quebec.net() + federal.net() - contributions;

        Self {
            household: household.to_string(),
            year,
            gross_income,
            programs,
            quebec,
            federal,
            contributions,
            disposable_income,
        }
    }

    /// Total of one program, or zero if it was not evaluated.
    pub fn amount(
        &self,
        program: ProgramId,
    ) -> Decimal {
        self.programs
            .get(&program)
            .map_or(Decimal::ZERO, |result| result.total)
    }

    /// Flat named amounts compared field by field against a reference.
    pub fn fields(&self) -> BTreeMap<String, Decimal> {
        let mut fields: BTreeMap<String, Decimal> = self
            .programs
            .iter()
            .map(|(program, result)| (program.as_str().to_string(), result.total))
            .collect();
        fields.insert(GROSS_INCOME_FIELD.to_string(), self.gross_income);
        fields.insert(QUEBEC_TOTAL_FIELD.to_string(), self.quebec.net());
        fields.insert(FEDERAL_TOTAL_FIELD.to_string(), self.federal.net());
        fields.insert(CONTRIBUTIONS_TOTAL_FIELD.to_string(), self.contributions);
        fields.insert(DISPOSABLE_INCOME_FIELD.to_string(), self.disposable_income);
        fields
    }

    /// Recomputes the grand total from the stored program results, ignoring
    /// the stored sub-totals.
    pub fn recompute_disposable_income(&self) -> Decimal {
        self.programs
            .values()
            .fold(self.gross_income, |acc, result| match result.program.kind() {
                ProgramKind::Transfer => acc + result.total,
                ProgramKind::Tax | ProgramKind::Contribution => acc - result.total,
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Adult, HouseholdType};

    fn result(
        program: ProgramId,
        amount: Decimal,
    ) -> (ProgramId, ProgramResult) {
        (program, ProgramResult::new(program, 2024, "h", AdultSplit::first(amount)))
    }

    fn couple() -> Household {
        Household::new(
            HouseholdType::Couple,
            Adult::worker(40, dec!(30000)),
            Some(Adult::worker(40, dec!(10000))),
        )
    }

    // =========================================================================
    // AdultSplit tests
    // =========================================================================

    #[test]
    fn even_split_keeps_odd_cent_total() {
        let split = AdultSplit::even(&couple(), dec!(100.01)).rounded();

        assert_eq!(split.total(), dec!(100.01));
    }

    #[test]
    fn pro_rata_follows_weights() {
        let split = AdultSplit::pro_rata(&couple(), dec!(400), AdultSplit::new(dec!(30000), dec!(10000)));

        assert_eq!(split, AdultSplit::new(dec!(300), dec!(100)));
    }

    #[test]
    fn pro_rata_falls_back_to_even_with_zero_weights() {
        let split = AdultSplit::pro_rata(&couple(), dec!(400), AdultSplit::ZERO);

        assert_eq!(split, AdultSplit::new(dec!(200), dec!(200)));
    }

    #[test]
    fn program_result_total_matches_rounded_shares() {
        let result = ProgramResult::new(
            ProgramId::SolidarityCredit,
            2024,
            "h",
            AdultSplit::new(dec!(10.005), dec!(10.005)),
        );

        assert_eq!(result.split, AdultSplit::new(dec!(10.01), dec!(10.01)));
        assert_eq!(result.total, dec!(20.02));
    }

    // =========================================================================
    // DisposableIncomeResult tests
    // =========================================================================

    #[test]
    fn totals_apply_program_signs() {
        let programs = BTreeMap::from([
            result(ProgramId::QuebecIncomeTax, dec!(1000)),
            result(ProgramId::FamilyAllowance, dec!(2500)),
            result(ProgramId::FederalIncomeTax, dec!(1500)),
            result(ProgramId::QuebecAbatement, dec!(247.50)),
            result(ProgramId::EmploymentInsurance, dec!(400)),
            result(ProgramId::QuebecPensionPlan, dec!(1600)),
        ]);

        let outcome = DisposableIncomeResult::from_programs("h", 2024, dec!(30000), programs);

        assert_eq!(outcome.quebec.net(), dec!(1500));
        assert_eq!(outcome.federal.net(), dec!(-1252.50));
        assert_eq!(outcome.contributions, dec!(2000));
        assert_eq!(outcome.disposable_income, dec!(28247.50));
        assert_eq!(outcome.recompute_disposable_income(), outcome.disposable_income);
    }

    #[test]
    fn fields_include_programs_and_totals() {
        let programs = BTreeMap::from([result(ProgramId::SchoolSupplies, dec!(121))]);

        let fields = DisposableIncomeResult::from_programs("h", 2024, dec!(0), programs).fields();

        assert_eq!(fields.get("school_supplies"), Some(&dec!(121)));
        assert_eq!(fields.get(QUEBEC_TOTAL_FIELD), Some(&dec!(121)));
        assert_eq!(fields.get(DISPOSABLE_INCOME_FIELD), Some(&dec!(121)));
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn amount_defaults_to_zero_for_programs_not_evaluated() {
        let outcome = DisposableIncomeResult::from_programs("h", 2024, dec!(0), BTreeMap::new());

        assert_eq!(outcome.amount(ProgramId::GstCredit), dec!(0));
    }
}
