//! Household description evaluated by the engine.
//!
//! A household has one or two adults and, for the family types, any number
//! of dependent children. [`Household::validate`] enforces the structural
//! rules below before any program is computed:
//!
//! | Rule                                                     | Applies to                    |
//! |----------------------------------------------------------|-------------------------------|
//! | exactly two adults                                       | `couple`, `retired_couple`    |
//! | exactly one adult                                        | every other type              |
//! | children allowed                                         | `single_parent`, `couple`     |
//! | single parents have at least one child                   | `single_parent`               |
//! | every adult is 65 or older                               | `retired_single`, `retired_couple` |
//! | incomes and childcare fees are non-negative              | all                           |
//! | children are dependants (17 or younger)                  | all                           |
//! | a declared custody share lies within 0 and 1             | all                           |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Age at which the retired household types apply.
pub const RETIREMENT_AGE: u32 = 65;

/// Oldest age at which a child is still a dependant.
pub const MAX_CHILD_AGE: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdType {
    Single,
    SingleParent,
    Couple,
    RetiredSingle,
    RetiredCouple,
}

impl HouseholdType {
    pub const ALL: [HouseholdType; 5] = [
        HouseholdType::Single,
        HouseholdType::SingleParent,
        HouseholdType::Couple,
        HouseholdType::RetiredSingle,
        HouseholdType::RetiredCouple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::SingleParent => "single_parent",
            Self::Couple => "couple",
            Self::RetiredSingle => "retired_single",
            Self::RetiredCouple => "retired_couple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn is_couple(&self) -> bool {
        matches!(self, Self::Couple | Self::RetiredCouple)
    }

    pub fn is_retired(&self) -> bool {
        matches!(self, Self::RetiredSingle | Self::RetiredCouple)
    }

    pub fn allows_children(&self) -> bool {
        matches!(self, Self::SingleParent | Self::Couple)
    }

    /// One adult and nobody else in the dwelling.
    pub fn lives_alone(&self) -> bool {
        matches!(self, Self::Single | Self::RetiredSingle)
    }

    pub fn adult_count(&self) -> usize {
        if self.is_couple() { 2 } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adult {
    pub age: u32,

    /// Employment earnings; the base for payroll contributions.
    #[serde(default)]
    pub work_income: Decimal,

    /// Pension and other non-employment income.
    #[serde(default)]
    pub retirement_income: Decimal,
}

impl Adult {
    pub fn worker(
        age: u32,
        work_income: Decimal,
    ) -> Self {
        Self {
            age,
            work_income,
            retirement_income: Decimal::ZERO,
        }
    }

    pub fn retiree(
        age: u32,
        retirement_income: Decimal,
    ) -> Self {
        Self {
            age,
            work_income: Decimal::ZERO,
            retirement_income,
        }
    }

    pub fn gross_income(&self) -> Decimal {
        self.work_income + self.retirement_income
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareType {
    /// Reduced-contribution daycare; fees do not qualify for the credit.
    Subsidized,
    NonSubsidized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Childcare {
    pub fee: Decimal,
    pub care_type: CareType,
}

/// Share of a child's benefits attributed to this household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Custody {
    #[default]
    Full,
    /// Alternating custody; one half.
    Shared,
    /// Explicit share between 0 and 1.
    Declared(Decimal),
}

impl Custody {
    pub fn share(&self) -> Decimal {
        match self {
            Custody::Full => Decimal::ONE,
            Custody::Shared => Decimal::new(5, 1),
            Custody::Declared(share) => *share,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub age: u32,

    #[serde(default)]
    pub childcare: Option<Childcare>,

    #[serde(default)]
    pub custody: Custody,
}

impl Child {
    pub fn new(age: u32) -> Self {
        Self {
            age,
            childcare: None,
            custody: Custody::Full,
        }
    }

    pub fn with_childcare(
        mut self,
        fee: Decimal,
        care_type: CareType,
    ) -> Self {
        self.childcare = Some(Childcare { fee, care_type });
        self
    }

    pub fn with_custody(
        mut self,
        custody: Custody,
    ) -> Self {
        self.custody = custody;
        self
    }

    pub fn share(&self) -> Decimal {
        self.custody.share()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    /// Identifier carried into errors and comparison reports.
    #[serde(default)]
    pub id: String,

    pub household_type: HouseholdType,

    pub adult1: Adult,

    #[serde(default)]
    pub adult2: Option<Adult>,

    #[serde(default)]
    pub children: Vec<Child>,
}

impl Household {
    pub fn new(
        household_type: HouseholdType,
        adult1: Adult,
        adult2: Option<Adult>,
    ) -> Self {
        Self {
            id: String::new(),
            household_type,
            adult1,
            adult2,
            children: Vec::new(),
        }
    }

    pub fn with_id(
        mut self,
        id: impl Into<String>,
    ) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_children(
        mut self,
        children: Vec<Child>,
    ) -> Self {
        self.children = children;
        self
    }

    /// Name used in errors and logs.
    pub fn label(&self) -> &str {
        if self.id.is_empty() { "<unnamed>" } else { &self.id }
    }

    pub fn is_couple(&self) -> bool {
        self.household_type.is_couple()
    }

    pub fn adults(&self) -> impl Iterator<Item = &Adult> {
        std::iter::once(&self.adult1).chain(self.adult2.as_ref())
    }

    pub fn gross_income(&self) -> Decimal {
        self.adults().map(Adult::gross_income).sum()
    }

    pub fn work_income(&self) -> Decimal {
        self.adults().map(|a| a.work_income).sum()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Checks the structural invariants listed in the module documentation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHousehold`] describing the first
    /// violated rule.
    pub fn validate(&self) -> Result<(), EngineError> {
        let kind = self.household_type;

        match (kind.is_couple(), &self.adult2) {
            (true, None) => return Err(self.invalid(format!("{} requires two adults", kind.as_str()))),
            (false, Some(_)) => {
                return Err(self.invalid(format!("{} allows only one adult", kind.as_str())));
            }
            _ => {}
        }

        if !kind.allows_children() && self.has_children() {
            return Err(self.invalid(format!("{} cannot have children", kind.as_str())));
        }

        if kind == HouseholdType::SingleParent && !self.has_children() {
            return Err(self.invalid("single_parent requires at least one child".to_string()));
        }

        for (index, adult) in self.adults().enumerate() {
            if kind.is_retired() && adult.age < RETIREMENT_AGE {
                return Err(self.invalid(format!(
                    "adult {} is {} but {} requires age {RETIREMENT_AGE} or more",
                    index + 1,
                    adult.age,
                    kind.as_str()
                )));
            }
            if adult.work_income < Decimal::ZERO || adult.retirement_income < Decimal::ZERO {
                return Err(self.invalid(format!("adult {} has negative income", index + 1)));
            }
        }

        for (index, child) in self.children.iter().enumerate() {
            if child.age > MAX_CHILD_AGE {
                return Err(self.invalid(format!(
                    "child {} is {} but dependants are {MAX_CHILD_AGE} or younger",
                    index + 1,
                    child.age
                )));
            }
            if child.childcare.as_ref().is_some_and(|care| care.fee < Decimal::ZERO) {
                return Err(self.invalid(format!("child {} has a negative childcare fee", index + 1)));
            }
            let share = child.share();
            if share < Decimal::ZERO || share > Decimal::ONE {
                return Err(self.invalid(format!(
                    "child {} has custody share {share} outside 0..=1",
                    index + 1
                )));
            }
        }

        Ok(())
    }

    fn invalid(
        &self,
        reason: String,
    ) -> EngineError {
        EngineError::InvalidHousehold {
            household: self.label().to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn reason(result: Result<(), EngineError>) -> String {
        match result {
            Err(EngineError::InvalidHousehold { reason, .. }) => reason,
            other => panic!("expected InvalidHousehold, got {other:?}"),
        }
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_single_worker() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(30000)), None);

        assert_eq!(household.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_couple_without_second_adult() {
        let household = Household::new(HouseholdType::Couple, Adult::worker(30, dec!(0)), None);

        assert_eq!(reason(household.validate()), "couple requires two adults");
    }

    #[test]
    fn validate_rejects_single_with_second_adult() {
        let household = Household::new(
            HouseholdType::Single,
            Adult::worker(30, dec!(0)),
            Some(Adult::worker(30, dec!(0))),
        );

        assert_eq!(reason(household.validate()), "single allows only one adult");
    }

    #[test]
    fn validate_rejects_children_in_single_household() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(0)), None)
            .with_children(vec![Child::new(4)]);

        assert_eq!(reason(household.validate()), "single cannot have children");
    }

    #[test]
    fn validate_rejects_single_parent_without_children() {
        let household = Household::new(HouseholdType::SingleParent, Adult::worker(30, dec!(0)), None);

        assert_eq!(
            reason(household.validate()),
            "single_parent requires at least one child"
        );
    }

    #[test]
    fn validate_rejects_young_retiree() {
        let household =
            Household::new(HouseholdType::RetiredSingle, Adult::retiree(60, dec!(20000)), None)
                .with_id("r1");

        let err = household.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid household 'r1': adult 1 is 60 but retired_single requires age 65 or more"
        );
    }

    #[test]
    fn validate_rejects_negative_income() {
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(-1)), None);

        assert_eq!(reason(household.validate()), "adult 1 has negative income");
    }

    #[test]
    fn validate_rejects_adult_aged_child() {
        let household = Household::new(HouseholdType::SingleParent, Adult::worker(40, dec!(0)), None)
            .with_children(vec![Child::new(18)]);

        assert_eq!(
            reason(household.validate()),
            "child 1 is 18 but dependants are 17 or younger"
        );
    }

    #[test]
    fn validate_rejects_custody_share_above_one() {
        let household = Household::new(HouseholdType::SingleParent, Adult::worker(40, dec!(0)), None)
            .with_children(vec![Child::new(8).with_custody(Custody::Declared(dec!(1.5)))]);

        assert_eq!(
            reason(household.validate()),
            "child 1 has custody share 1.5 outside 0..=1"
        );
    }

    // =========================================================================
    // accessor tests
    // =========================================================================

    #[test]
    fn gross_income_sums_both_adults() {
        let household = Household::new(
            HouseholdType::Couple,
            Adult::worker(40, dec!(50000)),
            Some(Adult {
                age: 38,
                work_income: dec!(20000),
                retirement_income: dec!(1500),
            }),
        );

        assert_eq!(household.gross_income(), dec!(71500));
        assert_eq!(household.work_income(), dec!(70000));
    }

    #[test]
    fn shared_custody_is_one_half() {
        assert_eq!(Child::new(10).with_custody(Custody::Shared).share(), dec!(0.5));
    }

    #[test]
    fn household_deserializes_with_defaults() {
        let json = r#"{
            "household_type": "single_parent",
            "adult1": { "age": 35, "work_income": "42000" },
            "children": [ { "age": 10, "custody": "shared" } ]
        }"#;

        let household: Household = serde_json::from_str(json).unwrap();

        assert_eq!(household.label(), "<unnamed>");
        assert_eq!(household.adult1.retirement_income, dec!(0));
        assert_eq!(household.children[0].custody, Custody::Shared);
        assert_eq!(household.validate(), Ok(()));
    }
}
