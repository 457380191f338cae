use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a bracket schedule: `rate` applies to income in `(lower, upper]`.
///
/// The top band of a schedule has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower: Decimal,
        upper: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { lower, upper, rate }
    }

    /// Returns true when `income` falls inside this band.
    ///
    /// The first band also contains its lower bound so that zero income
    /// always matches a band.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        let above_lower = income > self.lower || (self.lower.is_zero() && income.is_zero());
        above_lower && self.upper.is_none_or(|upper| income <= upper)
    }
}
