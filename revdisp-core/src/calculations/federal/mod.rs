//! Federal income tax and federal transfers.

mod abatement;
mod child_benefit;
mod gst_credit;
mod income_supplement;
mod income_tax;
mod old_age_security;
mod workers_benefit;

pub use abatement::QuebecAbatement;
pub use child_benefit::ChildBenefit;
pub use gst_credit::GstCredit;
pub use income_supplement::GuaranteedIncomeSupplement;
pub use income_tax::FederalIncomeTax;
pub use old_age_security::OldAgeSecurity;
pub use workers_benefit::WorkersBenefit;
