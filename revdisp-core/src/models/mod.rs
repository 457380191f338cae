mod household;
mod jurisdiction;
mod parameter;
mod program;
mod results;
mod tax_bracket;
mod tax_year_context;

pub use household::{
    Adult, CareType, Child, Childcare, Custody, Household, HouseholdType, MAX_CHILD_AGE,
    RETIREMENT_AGE,
};
pub use jurisdiction::Jurisdiction;
pub use parameter::ParameterRecord;
pub use program::{ProgramId, ProgramKind};
pub use results::{
    AdultSplit, CONTRIBUTIONS_TOTAL_FIELD, DISPOSABLE_INCOME_FIELD, DisposableIncomeResult,
    FEDERAL_TOTAL_FIELD, GROSS_INCOME_FIELD, JurisdictionTotals, ProgramResult,
    QUEBEC_TOTAL_FIELD,
};
pub use tax_bracket::TaxBracket;
pub use tax_year_context::{TaxYearContext, TaxYearContextBuilder};
