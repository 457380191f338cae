use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::ParameterSource;
use crate::error::EngineError;
use crate::models::{Jurisdiction, TaxYearContext};

type Key = (i32, Jurisdiction);

/// Cache of immutable [`TaxYearContext`] snapshots.
///
/// The first request for a key builds the context from the source; every
/// later request returns the same `Arc`. Contexts are never mutated or
/// evicted, so readers on any thread see a consistent table.
pub struct ParameterStore {
    source: Box<dyn ParameterSource>,
    contexts: RwLock<HashMap<Key, Arc<TaxYearContext>>>,
}

impl ParameterStore {
    pub fn new(source: impl ParameterSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            contexts: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the context for `year` and `jurisdiction`, loading it on first
    /// use.
    ///
    /// # Errors
    ///
    /// * [`EngineError::UnsupportedYear`] if the source has no such table.
    /// * [`EngineError::InvalidParameter`] if the table is malformed.
    /// * [`EngineError::Source`] if the source fails.
    pub fn get_context(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<Arc<TaxYearContext>, EngineError> {
        let key = (year, jurisdiction);
        {
            let contexts = self.contexts.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(context) = contexts.get(&key) {
                return Ok(Arc::clone(context));
            }
        }

        let records = self
            .source
            .load(year, jurisdiction)?
            .ok_or(EngineError::UnsupportedYear { year, jurisdiction })?;
        let context = TaxYearContext::from_records(year, jurisdiction, records)?;
        debug!(year, jurisdiction = %jurisdiction, parameters = context.len(), "loaded tax year context");

        // Another thread may have won the race; keep whichever was first.
        let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);
        let cached = contexts.entry(key).or_insert_with(|| Arc::new(context));
        Ok(Arc::clone(cached))
    }

    /// Years for which both jurisdictions have a table.
    pub fn supported_years(&self) -> Vec<i32> {
        self.source
            .years()
            .into_iter()
            .filter(|&year| {
                Jurisdiction::ALL
                    .iter()
                    .all(|&jurisdiction| matches!(self.source.load(year, jurisdiction), Ok(Some(_))))
            })
            .collect()
    }

    /// Builds every context the source provides.
    ///
    /// # Errors
    ///
    /// Returns the first load or validation error.
    pub fn preload(&self) -> Result<usize, EngineError> {
        let mut loaded = 0;
        for year in self.source.years() {
            for jurisdiction in Jurisdiction::ALL {
                if self.source.load(year, jurisdiction)?.is_some() {
                    self.get_context(year, jurisdiction)?;
                    loaded += 1;
                }
            }
        }
        Ok(loaded)
    }

    /// Number of contexts currently cached.
    pub fn cached(&self) -> usize {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("years", &self.source.years())
            .field("cached", &self.cached())
            .finish()
    }
}
