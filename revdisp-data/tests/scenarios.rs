//! End-to-end evaluations of reference households against the built-in
//! parameter tables.

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use revdisp_core::{
    Adult, CaseSpace, Child, Custody, DifferentialValidator, Household, HouseholdType,
    Orchestrator, ParameterStore, ProgramId, ProgramKind, TestCaseGenerator,
};
use revdisp_data::{ParameterTableLoader, builtin_store};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn engine() -> Orchestrator {
    Orchestrator::with_standard_programs(Arc::new(builtin_store().unwrap())).unwrap()
}

/// An engine over the tables on disk, independent of the built-in copies.
fn reference() -> Orchestrator {
    let tables = Path::new(env!("CARGO_MANIFEST_DIR")).join("tables");
    let source = ParameterTableLoader::load_dir(&tables).unwrap();
    Orchestrator::with_standard_programs(Arc::new(ParameterStore::new(source))).unwrap()
}

fn within_a_cent(
    actual: Decimal,
    expected: Decimal,
) -> bool {
    (actual - expected).abs() <= dec!(0.01)
}

#[test]
fn single_worker_2023_quebec_tax_matches_hand_computation() {
    // taxable 30000 - 1315 = 28685, tax 4015.90
    // credits (17183 + 1969 + 381 + 148.20 + 1696) x 0.14 = 2992.81
    let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(30000)), None).with_id("single-30");

    let outcome = engine().evaluate(&household, 2023).unwrap();

    assert!(within_a_cent(outcome.amount(ProgramId::QuebecIncomeTax), dec!(1023.09)));
    assert_eq!(outcome.amount(ProgramId::EmploymentInsurance), dec!(381.00));
    assert_eq!(outcome.amount(ProgramId::ParentalInsurance), dec!(148.20));
    assert_eq!(outcome.amount(ProgramId::QuebecPensionPlan), dec!(1696.00));
    assert_eq!(outcome.amount(ProgramId::FederalIncomeTax), dec!(1711.02));
    assert_eq!(outcome.amount(ProgramId::QuebecAbatement), dec!(282.32));
}

#[test]
fn couple_without_income_gets_full_family_allowance() {
    let household = Household::new(
        HouseholdType::Couple,
        Adult::worker(35, dec!(0)),
        Some(Adult::worker(35, dec!(0))),
    )
    .with_id("couple-3-7")
    .with_children(vec![Child::new(3), Child::new(7)]);

    let engine = engine();
    let reference = reference();

    for outcome in [
        engine.evaluate(&household, 2024).unwrap(),
        reference.evaluate(&household, 2024).unwrap(),
    ] {
        assert_eq!(outcome.amount(ProgramId::FamilyAllowance), dec!(5846));
        assert_eq!(outcome.amount(ProgramId::QuebecIncomeTax), dec!(0));
        assert_eq!(outcome.amount(ProgramId::FederalIncomeTax), dec!(0));
        assert_eq!(outcome.amount(ProgramId::SchoolSupplies), dec!(121));
        assert_eq!(outcome.amount(ProgramId::SolidarityCredit), dec!(1857));
    }

    let report = DifferentialValidator::new(&engine, &reference)
        .compare(&household, 2024)
        .unwrap();

    let fields = engine.evaluate(&household, 2024).unwrap().fields();
    assert!(report.passed(), "{:?}", report.mismatches);
    assert!(fields.contains_key("family_allowance"));
    assert_eq!(report.compared, fields.len());
    assert!(report.engine_only.is_empty());
    assert!(report.oracle_only.is_empty());
}

#[test]
fn shared_custody_halves_school_supplies() {
    let household = Household::new(HouseholdType::SingleParent, Adult::worker(40, dec!(45000)), None)
        .with_id("shared-10")
        .with_children(vec![Child::new(10).with_custody(Custody::Shared)]);

    let outcome = engine().evaluate(&household, 2024).unwrap();

    assert_eq!(outcome.amount(ProgramId::SchoolSupplies), dec!(60.50));
}

#[test]
fn zero_income_pays_no_tax_or_contribution() {
    let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(0)), None).with_id("zero");

    let outcome = engine().evaluate(&household, 2024).unwrap();

    for (program, result) in &outcome.programs {
        if program.kind() != ProgramKind::Transfer {
            assert_eq!(result.total, dec!(0), "{program}");
        }
    }
    assert_eq!(outcome.amount(ProgramId::WorkPremium), dec!(0));
    assert_eq!(outcome.amount(ProgramId::SolidarityCredit), dec!(1221));
    assert_eq!(outcome.amount(ProgramId::GstCredit), dec!(340));
    assert_eq!(outcome.amount(ProgramId::SocialAssistance), dec!(9684));
    assert_eq!(outcome.disposable_income, dec!(11245));
}

#[test]
fn retired_couple_receives_pension_and_supplement() {
    let household = Household::new(
        HouseholdType::RetiredCouple,
        Adult::retiree(70, dec!(8000)),
        Some(Adult::retiree(68, dec!(4000))),
    )
    .with_id("retired");

    let outcome = engine().evaluate(&household, 2024).unwrap();
    let pension = &outcome.programs[&ProgramId::OldAgeSecurity];

    assert_eq!(pension.total, dec!(17236.08));
    assert_eq!(outcome.amount(ProgramId::GuaranteedIncomeSupplement), dec!(9600.00));
    assert_eq!(outcome.amount(ProgramId::SeniorAssistance), dec!(2000));
    assert_eq!(outcome.amount(ProgramId::SocialAssistance), dec!(0));
    assert_eq!(outcome.amount(ProgramId::EmploymentInsurance), dec!(0));
}

#[test]
fn every_generated_household_balances_and_stays_non_negative() {
    let engine = engine();
    let generator = TestCaseGenerator::new(2024, CaseSpace::default()).unwrap();

    for year in [2023, 2024] {
        for household in generator.generate(300) {
            let outcome = engine.evaluate(&household, year).unwrap();

            assert_eq!(outcome.recompute_disposable_income(), outcome.disposable_income, "{}", household.id);
            for result in outcome.programs.values() {
                assert!(result.split.adult1 >= Decimal::ZERO, "{} {}", household.id, result.program);
                assert!(result.split.adult2 >= Decimal::ZERO, "{} {}", household.id, result.program);
                assert_eq!(result.total, result.split.adult1 + result.split.adult2);
            }
        }
    }
}

#[test]
fn evaluation_is_deterministic_across_engines() {
    let first = engine();
    let second = engine();
    let generator = TestCaseGenerator::new(99, CaseSpace::default()).unwrap();

    for household in generator.generate(100) {
        assert_eq!(
            first.evaluate(&household, 2024).unwrap(),
            second.evaluate(&household, 2024).unwrap()
        );
    }
}

#[test]
fn unsupported_year_is_reported() {
    let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(0)), None);

    let err = engine().evaluate(&household, 2019).unwrap_err();

    assert_eq!(err.to_string(), "tax year 2019 is not supported for QC");
}
