//! Error taxonomy shared by the parameter store, the calculators and the
//! orchestrator.
//!
//! | Variant                 | Raised when                                              |
//! |-------------------------|----------------------------------------------------------|
//! | `UnsupportedYear`       | no parameter table exists for the requested year         |
//! | `InvalidHousehold`      | a household violates a structural invariant              |
//! | `DependencyCycle`       | the declared program dependencies contain a cycle        |
//! | `UnregisteredDependency`| a program depends on a program nobody registered         |
//! | `DuplicateProgram`      | two calculators claim the same program                   |
//! | `InvalidParameter`      | a table is missing a required field or is malformed      |
//! | `DuplicateTable`        | a second table is registered for an existing year        |
//! | `UndeclaredDependency`  | a calculator reads a result it did not declare           |
//! | `Source`                | the parameter source itself failed                       |
//! | `Program`               | any of the above, raised inside a calculator             |
//!
//! Configuration errors (cycles, unregistered or duplicate programs, missing
//! parameters) are fatal and surface when the orchestrator is built or a year
//! is checked, never silently during evaluation.

use thiserror::Error;

use crate::models::{Jurisdiction, ProgramId};

/// Errors produced by the calculation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No parameter table exists for the requested year and jurisdiction.
    #[error("tax year {year} is not supported for {jurisdiction}")]
    UnsupportedYear { year: i32, jurisdiction: Jurisdiction },

    /// The household violates a structural invariant.
    #[error("invalid household '{household}': {reason}")]
    InvalidHousehold { household: String, reason: String },

    /// The program dependency graph contains a cycle.
    #[error("dependency cycle between programs: {}", join_programs(.programs))]
    DependencyCycle { programs: Vec<ProgramId> },

    /// A program declares a dependency on a program that is not registered.
    #[error("program {program} depends on unregistered program {dependency}")]
    UnregisteredDependency { program: ProgramId, dependency: ProgramId },

    /// Two calculators were registered for the same program.
    #[error("program {0} registered more than once")]
    DuplicateProgram(ProgramId),

    /// A parameter is missing or malformed in a tax year table.
    #[error("invalid parameter {program}.{parameter} for {jurisdiction} {year}: {reason}")]
    InvalidParameter {
        year: i32,
        jurisdiction: Jurisdiction,
        program: ProgramId,
        parameter: String,
        reason: String,
    },

    /// Parameter tables are append-only; a year cannot be registered twice.
    #[error("a parameter table for {jurisdiction} {year} already exists")]
    DuplicateTable { year: i32, jurisdiction: Jurisdiction },

    /// A calculator read the result of a program it did not declare.
    #[error("program {program} read undeclared or missing result {dependency}")]
    UndeclaredDependency { program: ProgramId, dependency: ProgramId },

    /// The parameter source could not provide a table.
    #[error("parameter source error: {0}")]
    Source(String),

    /// An error raised while computing one program for one household.
    #[error("{program} failed for household '{household}' in {year}: {source}")]
    Program {
        program: ProgramId,
        year: i32,
        household: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Wraps this error with the program, year and household it occurred in.
    ///
    /// Errors that already carry that context are returned unchanged.
    pub fn in_program(
        self,
        program: ProgramId,
        year: i32,
        household: &str,
    ) -> Self {
        match self {
            err @ EngineError::Program { .. } => err,
            other => EngineError::Program {
                program,
                year,
                household: household.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, looking through `Program` context.
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::Program { source, .. } => source.root(),
            other => other,
        }
    }
}

fn join_programs(programs: &[ProgramId]) -> String {
    programs
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
