//! Disposable-income engine for Quebec households.
//!
//! Applies Quebec and federal taxes, contributions and transfers to a
//! [`Household`] for a given tax year and reports the resulting disposable
//! income, program by program.
//!
//! | Module           | Role                                                        |
//! |------------------|-------------------------------------------------------------|
//! | [`models`]       | households, parameter rows, tax-year contexts, results      |
//! | [`params`]       | parameter sources and the context cache                     |
//! | [`calculations`] | one calculator per program, plus shared arithmetic          |
//! | [`engine`]       | dependency ordering and evaluation                          |
//! | [`validation`]   | field-by-field comparison against a reference engine        |
//! | [`generator`]    | seeded random households                                    |

pub mod calculations;
pub mod engine;
pub mod error;
pub mod generator;
pub mod models;
pub mod params;
pub mod validation;

pub use calculations::ProgramCalculator;
pub use engine::{DependencyGraph, Orchestrator};
pub use error::EngineError;
pub use generator::{CaseSpace, GeneratorError, TestCaseGenerator};
pub use models::*;
pub use params::{MemorySource, ParameterSource, ParameterStore};
pub use validation::{
    BatchReport, ComparisonReport, DEFAULT_TOLERANCE, DifferentialValidator, FieldMismatch,
    OracleError, ReferenceOracle, ReferenceRecord, ValidationError,
};
