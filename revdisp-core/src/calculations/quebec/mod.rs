//! Quebec income tax and Quebec transfers.

mod childcare;
mod family_allowance;
mod income_tax;
mod school_supplies;
mod senior_assistance;
mod social_assistance;
mod solidarity;
mod work_premium;

pub use childcare::ChildcareCredit;
pub use family_allowance::FamilyAllowance;
pub use income_tax::QuebecIncomeTax;
pub use school_supplies::SchoolSupplies;
pub use senior_assistance::SeniorAssistance;
pub use social_assistance::SocialAssistance;
pub use solidarity::SolidarityCredit;
pub use work_premium::WorkPremium;
