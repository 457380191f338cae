//! Identifiers for every socio-fiscal program the engine knows about.
//!
//! | Code                           | Jurisdiction | Kind         |
//! |--------------------------------|--------------|--------------|
//! | `employment_insurance`         | CA           | contribution |
//! | `parental_insurance`           | QC           | contribution |
//! | `quebec_pension_plan`          | QC           | contribution |
//! | `health_services_fund`         | QC           | contribution |
//! | `drug_insurance`               | QC           | contribution |
//! | `quebec_income_tax`            | QC           | tax          |
//! | `family_allowance`             | QC           | transfer     |
//! | `school_supplies`              | QC           | transfer     |
//! | `solidarity_credit`            | QC           | transfer     |
//! | `childcare_credit`             | QC           | transfer     |
//! | `work_premium`                 | QC           | transfer     |
//! | `senior_assistance`            | QC           | transfer     |
//! | `social_assistance`            | QC           | transfer     |
//! | `federal_income_tax`           | CA           | tax          |
//! | `quebec_abatement`             | CA           | transfer     |
//! | `child_benefit`                | CA           | transfer     |
//! | `gst_credit`                   | CA           | transfer     |
//! | `workers_benefit`              | CA           | transfer     |
//! | `old_age_security`             | CA           | transfer     |
//! | `guaranteed_income_supplement` | CA           | transfer     |
//!
//! The declaration order doubles as the tie-break order when the orchestrator
//! sorts programs that have no dependency between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Jurisdiction;

/// How a program's amount enters disposable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramKind {
    /// Income tax owed; subtracted.
    Tax,
    /// Payroll or health contribution; subtracted.
    Contribution,
    /// Credit or benefit received; added.
    Transfer,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProgramId {
    EmploymentInsurance,
    ParentalInsurance,
    QuebecPensionPlan,
    HealthServicesFund,
    DrugInsurance,
    QuebecIncomeTax,
    FamilyAllowance,
    SchoolSupplies,
    SolidarityCredit,
    ChildcareCredit,
    WorkPremium,
    SeniorAssistance,
    SocialAssistance,
    FederalIncomeTax,
    QuebecAbatement,
    ChildBenefit,
    GstCredit,
    WorkersBenefit,
    OldAgeSecurity,
    GuaranteedIncomeSupplement,
}

impl ProgramId {
    pub const ALL: [ProgramId; 20] = [
        ProgramId::EmploymentInsurance,
        ProgramId::ParentalInsurance,
        ProgramId::QuebecPensionPlan,
        ProgramId::HealthServicesFund,
        ProgramId::DrugInsurance,
        ProgramId::QuebecIncomeTax,
        ProgramId::FamilyAllowance,
        ProgramId::SchoolSupplies,
        ProgramId::SolidarityCredit,
        ProgramId::ChildcareCredit,
        ProgramId::WorkPremium,
        ProgramId::SeniorAssistance,
        ProgramId::SocialAssistance,
        ProgramId::FederalIncomeTax,
        ProgramId::QuebecAbatement,
        ProgramId::ChildBenefit,
        ProgramId::GstCredit,
        ProgramId::WorkersBenefit,
        ProgramId::OldAgeSecurity,
        ProgramId::GuaranteedIncomeSupplement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmploymentInsurance => "employment_insurance",
            Self::ParentalInsurance => "parental_insurance",
            Self::QuebecPensionPlan => "quebec_pension_plan",
            Self::HealthServicesFund => "health_services_fund",
            Self::DrugInsurance => "drug_insurance",
            Self::QuebecIncomeTax => "quebec_income_tax",
            Self::FamilyAllowance => "family_allowance",
            Self::SchoolSupplies => "school_supplies",
            Self::SolidarityCredit => "solidarity_credit",
            Self::ChildcareCredit => "childcare_credit",
            Self::WorkPremium => "work_premium",
            Self::SeniorAssistance => "senior_assistance",
            Self::SocialAssistance => "social_assistance",
            Self::FederalIncomeTax => "federal_income_tax",
            Self::QuebecAbatement => "quebec_abatement",
            Self::ChildBenefit => "child_benefit",
            Self::GstCredit => "gst_credit",
            Self::WorkersBenefit => "workers_benefit",
            Self::OldAgeSecurity => "old_age_security",
            Self::GuaranteedIncomeSupplement => "guaranteed_income_supplement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    /// Human-readable program name for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmploymentInsurance => "Employment Insurance",
            Self::ParentalInsurance => "Quebec Parental Insurance Plan",
            Self::QuebecPensionPlan => "Quebec Pension Plan",
            Self::HealthServicesFund => "Health Services Fund contribution",
            Self::DrugInsurance => "Public prescription drug insurance",
            Self::QuebecIncomeTax => "Quebec income tax",
            Self::FamilyAllowance => "Family allowance",
            Self::SchoolSupplies => "School supplies supplement",
            Self::SolidarityCredit => "Solidarity tax credit",
            Self::ChildcareCredit => "Childcare expenses tax credit",
            Self::WorkPremium => "Work premium",
            Self::SeniorAssistance => "Senior assistance amount",
            Self::SocialAssistance => "Social assistance",
            Self::FederalIncomeTax => "Federal income tax",
            Self::QuebecAbatement => "Refundable Quebec abatement",
            Self::ChildBenefit => "Canada child benefit",
            Self::GstCredit => "GST/HST credit",
            Self::WorkersBenefit => "Canada workers benefit",
            Self::OldAgeSecurity => "Old Age Security pension",
            Self::GuaranteedIncomeSupplement => "Guaranteed Income Supplement",
        }
    }

    /// The authority whose parameter table configures this program.
    pub fn jurisdiction(&self) -> Jurisdiction {
        match self {
            Self::EmploymentInsurance
            | Self::FederalIncomeTax
            | Self::QuebecAbatement
            | Self::ChildBenefit
            | Self::GstCredit
            | Self::WorkersBenefit
            | Self::OldAgeSecurity
            | Self::GuaranteedIncomeSupplement => Jurisdiction::Federal,
            _ => Jurisdiction::Quebec,
        }
    }

    pub fn kind(&self) -> ProgramKind {
        match self {
            Self::EmploymentInsurance
            | Self::ParentalInsurance
            | Self::QuebecPensionPlan
            | Self::HealthServicesFund
            | Self::DrugInsurance => ProgramKind::Contribution,
            Self::QuebecIncomeTax | Self::FederalIncomeTax => ProgramKind::Tax,
            _ => ProgramKind::Transfer,
        }
    }
}

impl fmt::Display for ProgramId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgramId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown program '{s}'"))
    }
}
