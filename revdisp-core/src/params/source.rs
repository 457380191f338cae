use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::models::{Jurisdiction, ParameterRecord};

/// Backend that provides parameter table rows.
///
/// Implementations must be append-only: once a table for a (year,
/// jurisdiction) has been served, later calls must return the same rows.
pub trait ParameterSource: Send + Sync {
    /// Years for which at least one jurisdiction has a table, ascending.
    fn years(&self) -> Vec<i32>;

    /// Rows of the table for `year` and `jurisdiction`, or `None` when the
    /// source has no such table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Source`] when the backend itself fails.
    fn load(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<Option<Vec<ParameterRecord>>, EngineError>;
}

/// In-process parameter source.
///
/// Tables are registered whole; registering a second table for an existing
/// key is rejected.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<(i32, Jurisdiction), Vec<ParameterRecord>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups `records` by (year, jurisdiction) and registers each group.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateTable`] if a key is already present.
    pub fn from_records(records: impl IntoIterator<Item = ParameterRecord>) -> Result<Self, EngineError> {
        let mut grouped: BTreeMap<(i32, Jurisdiction), Vec<ParameterRecord>> = BTreeMap::new();
        for record in records {
            grouped
                .entry((record.tax_year, record.jurisdiction))
                .or_default()
                .push(record);
        }

        let mut source = Self::new();
        for ((year, jurisdiction), rows) in grouped {
            source.insert_table(year, jurisdiction, rows)?;
        }
        Ok(source)
    }

    /// Registers the table for `year` and `jurisdiction`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateTable`] if that table already exists.
    pub fn insert_table(
        &mut self,
        year: i32,
        jurisdiction: Jurisdiction,
        records: Vec<ParameterRecord>,
    ) -> Result<(), EngineError> {
        if self.tables.contains_key(&(year, jurisdiction)) {
            return Err(EngineError::DuplicateTable { year, jurisdiction });
        }
        self.tables.insert((year, jurisdiction), records);
        Ok(())
    }

    /// Merges every table of `other` into this source.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateTable`] on the first key both sources
    /// define; tables merged before it are kept.
    pub fn extend(
        &mut self,
        other: MemorySource,
    ) -> Result<(), EngineError> {
        for ((year, jurisdiction), rows) in other.tables {
            self.insert_table(year, jurisdiction, rows)?;
        }
        Ok(())
    }

    pub fn contains(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> bool {
        self.tables.contains_key(&(year, jurisdiction))
    }
}

impl ParameterSource for MemorySource {
    fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.tables.keys().map(|(year, _)| *year).collect();
        years.dedup();
        years
    }

    fn load(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<Option<Vec<ParameterRecord>>, EngineError> {
        Ok(self.tables.get(&(year, jurisdiction)).cloned())
    }
}
