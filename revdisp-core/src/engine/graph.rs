use std::collections::{BTreeMap, BTreeSet};

use crate::error::EngineError;
use crate::models::ProgramId;

/// Directed graph over programs; an edge `a → b` means `b` reads `a`'s result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    dependencies: BTreeMap<ProgramId, Vec<ProgramId>>,
}

impl DependencyGraph {
    /// Builds the graph from each program's declared dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnregisteredDependency`] if a dependency is not
    /// itself a node of the graph.
    pub fn new<'a>(
        declarations: impl IntoIterator<Item = (ProgramId, &'a [ProgramId])>,
    ) -> Result<Self, EngineError> {
        let dependencies: BTreeMap<ProgramId, Vec<ProgramId>> = declarations
            .into_iter()
            .map(|(program, deps)| (program, deps.to_vec()))
            .collect();

        for (program, deps) in &dependencies {
            if let Some(missing) = deps.iter().find(|dep| !dependencies.contains_key(dep)) {
                return Err(EngineError::UnregisteredDependency {
                    program: *program,
                    dependency: *missing,
                });
            }
        }

        Ok(Self { dependencies })
    }

    /// Returns every program, each after all of its dependencies.
    ///
    /// Kahn's algorithm with an ordered ready set, so programs that become
    /// ready together come out in [`ProgramId`] order and the result is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DependencyCycle`] listing the programs that could
    /// not be ordered.
    pub fn topological_order(&self) -> Result<Vec<ProgramId>, EngineError> {
        let mut in_degree: BTreeMap<ProgramId, usize> = self
            .dependencies
            .iter()
            .map(|(program, deps)| (*program, deps.len()))
            .collect();

        let mut dependents: BTreeMap<ProgramId, Vec<ProgramId>> = BTreeMap::new();
        for (program, deps) in &self.dependencies {
            for dep in deps {
                dependents.entry(*dep).or_default().push(*program);
            }
        }

        let mut ready: BTreeSet<ProgramId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(program, _)| *program)
            .collect();
        let mut order = Vec::with_capacity(self.dependencies.len());

        while let Some(program) = ready.pop_first() {
            order.push(program);
            for dependent in dependents.get(&program).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        if order.len() != self.dependencies.len() {
            let ordered: BTreeSet<ProgramId> = order.into_iter().collect();
            let programs = self
                .dependencies
                .keys()
                .filter(|program| !ordered.contains(program))
                .copied()
                .collect();
            return Err(EngineError::DependencyCycle { programs });
        }

        Ok(order)
    }

    pub fn dependencies(
        &self,
        program: ProgramId,
    ) -> &[ProgramId] {
        self.dependencies
            .get(&program)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
