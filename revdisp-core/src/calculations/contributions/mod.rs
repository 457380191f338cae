//! Payroll and health contributions.
//!
//! These are computed first: the income tax calculators credit the payroll
//! contributions, and nothing here depends on another program except the
//! drug insurance premium, which is tested on net income.

mod drug_insurance;
mod health_services_fund;
mod payroll;
mod pension_plan;

pub use drug_insurance::DrugInsurance;
pub use health_services_fund::HealthServicesFund;
pub use payroll::{EmploymentInsurance, ParentalInsurance};
pub use pension_plan::QuebecPensionPlan;
