//! Runs the registered program calculators for one household and year.
//!
//! The evaluation order is fixed when the orchestrator is built: a
//! topological order over the declared dependencies, ties broken by program
//! order. Each evaluation then walks that order once:
//!
//! 1. validate the household;
//! 2. fetch the tax-year context of every jurisdiction involved;
//! 3. run each calculator with a view of the results it declared;
//! 4. round each adult's share to cents and store the result;
//! 5. assemble the sub-totals and the disposable income.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::calculations::{PriorResults, ProgramCalculator, standard_calculators};
use crate::engine::DependencyGraph;
use crate::error::EngineError;
use crate::models::{DisposableIncomeResult, Household, Jurisdiction, ProgramId, ProgramResult};
use crate::params::ParameterStore;

pub struct Orchestrator {
    store: Arc<ParameterStore>,
    calculators: BTreeMap<ProgramId, Box<dyn ProgramCalculator>>,
    order: Vec<ProgramId>,
    jurisdictions: BTreeSet<Jurisdiction>,
}

impl Orchestrator {
    /// Registers `calculators` and computes their evaluation order.
    ///
    /// # Errors
    ///
    /// * [`EngineError::DuplicateProgram`] if two calculators share a program.
    /// * [`EngineError::UnregisteredDependency`] if a dependency has no
    ///   calculator.
    /// * [`EngineError::DependencyCycle`] if the dependencies form a cycle.
    pub fn new(
        store: Arc<ParameterStore>,
        calculators: Vec<Box<dyn ProgramCalculator>>,
    ) -> Result<Self, EngineError> {
        let mut registered = BTreeMap::new();
        for calculator in calculators {
            let program = calculator.program();
            if registered.insert(program, calculator).is_some() {
                return Err(EngineError::DuplicateProgram(program));
            }
        }

        let graph = DependencyGraph::new(
            registered
                .iter()
                .map(|(program, calculator)| (*program, calculator.dependencies())),
        )?;
        let order = graph.topological_order()?;
        let jurisdictions = registered.keys().map(|program| program.jurisdiction()).collect();

        debug!(programs = order.len(), "built evaluation order");

        Ok(Self {
            store,
            calculators: registered,
            order,
            jurisdictions,
        })
    }

    /// An orchestrator running every program the engine ships.
    pub fn with_standard_programs(store: Arc<ParameterStore>) -> Result<Self, EngineError> {
        Self::new(store, standard_calculators())
    }

    /// Programs in the order they are evaluated.
    pub fn evaluation_order(&self) -> &[ProgramId] {
        &self.order
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Years the store can serve for every jurisdiction.
    pub fn supported_years(&self) -> Vec<i32> {
        self.store.supported_years()
    }

    /// Verifies that `year` has a table for every jurisdiction involved and
    /// that each calculator finds all the parameters it requires.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedYear`] or the first
    /// [`EngineError::InvalidParameter`] found.
    pub fn check_year(
        &self,
        year: i32,
    ) -> Result<(), EngineError> {
        for program in &self.order {
            let Some(calculator) = self.calculators.get(program) else {
                continue;
            };
            let jurisdiction = program.jurisdiction();
            let context = self.store.get_context(year, jurisdiction)?;
            if let Some(missing) = calculator
                .required_parameters()
                .iter()
                .find(|parameter| !context.contains(*program, parameter))
            {
                return Err(EngineError::InvalidParameter {
                    year,
                    jurisdiction,
                    program: *program,
                    parameter: (*missing).to_string(),
                    reason: "required by calculator but missing from parameter table".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Computes every registered program for `household` in `year`.
    ///
    /// # Errors
    ///
    /// * [`EngineError::InvalidHousehold`] if the household is malformed.
    /// * [`EngineError::UnsupportedYear`] if a context is missing.
    /// * [`EngineError::Program`] wrapping any calculator failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use revdisp_core::{MemorySource, Orchestrator, ParameterStore};
    ///
    /// let store = Arc::new(ParameterStore::new(MemorySource::new()));
    /// let orchestrator = Orchestrator::with_standard_programs(store).unwrap();
    ///
    /// assert_eq!(orchestrator.evaluation_order().len(), 20);
    /// ```
    pub fn evaluate(
        &self,
        household: &Household,
        year: i32,
    ) -> Result<DisposableIncomeResult, EngineError> {
        household.validate()?;
        let label = household.label();

        let mut contexts = BTreeMap::new();
        for jurisdiction in &self.jurisdictions {
            contexts.insert(*jurisdiction, self.store.get_context(year, *jurisdiction)?);
        }

        let mut results: BTreeMap<ProgramId, ProgramResult> = BTreeMap::new();
        for program in &self.order {
            let Some(calculator) = self.calculators.get(program) else {
                continue;
            };
            let Some(context) = contexts.get(&program.jurisdiction()) else {
                continue;
            };

            let prior = PriorResults::new(*program, &results, calculator.dependencies());
            let split = calculator
                .compute(household, context, &prior)
                .map_err(|err| err.in_program(*program, year, label))?;
            let result = ProgramResult::new(*program, year, label, split);

            trace!(
                household = label,
                program = %program,
                adult1 = %result.split.adult1,
                adult2 = %result.split.adult2,
                "computed program"
            );
            results.insert(*program, result);
        }

        let outcome = DisposableIncomeResult::from_programs(label, year, household.gross_income(), results);
        debug!(
            household = label,
            year,
            gross = %outcome.gross_income,
            disposable = %outcome.disposable_income,
            "evaluated household"
        );
        Ok(outcome)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("order", &self.order)
            .field("store", &self.store)
            .finish()
    }
}
