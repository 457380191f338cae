use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Jurisdiction, ProgramId};

/// One row of a versioned parameter table.
///
/// Scalar parameters leave both income bounds empty. Bracket schedule rows
/// carry `min_income` (and `max_income` except for the top band) and store the
/// band's rate in `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub tax_year: i32,
    pub jurisdiction: Jurisdiction,
    pub program: ProgramId,
    pub parameter: String,
    pub value: Decimal,
    pub min_income: Option<Decimal>,
    pub max_income: Option<Decimal>,
}

impl ParameterRecord {
    pub fn scalar(
        tax_year: i32,
        program: ProgramId,
        parameter: &str,
        value: Decimal,
    ) -> Self {
        Self {
            tax_year,
            jurisdiction: program.jurisdiction(),
            program,
            parameter: parameter.to_string(),
            value,
            min_income: None,
            max_income: None,
        }
    }

    pub fn bracket(
        tax_year: i32,
        program: ProgramId,
        parameter: &str,
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            tax_year,
            jurisdiction: program.jurisdiction(),
            program,
            parameter: parameter.to_string(),
            value: rate,
            min_income: Some(min_income),
            max_income,
        }
    }

    /// True when this row is one band of a bracket schedule.
    pub fn is_bracket(&self) -> bool {
        self.min_income.is_some() || self.max_income.is_some()
    }
}
