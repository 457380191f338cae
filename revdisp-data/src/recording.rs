//! Recorded reference results replayed as an oracle.
//!
//! A recording is a JSON document holding, for one tax year, a list of
//! households and the named amounts a reference engine produced for each:
//!
//! ```json
//! {
//!   "year": 2024,
//!   "cases": [
//!     {
//!       "household": { "id": "s42-0", "household_type": "single", "adult1": { "age": 35, "work_income": "30000" } },
//!       "fields": { "quebec_income_tax": "1247.95", "disposable_income": "26480.11" }
//!     }
//!   ]
//! }
//! ```
//!
//! Cases are looked up by household id, so every recorded household must
//! carry a distinct, non-empty id.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use revdisp_core::{
    EngineError, Household, OracleError, Orchestrator, ReferenceOracle, ReferenceRecord,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("cannot access {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("invalid recording: {0}")]
    Json(String),

    #[error("recorded household has no id")]
    MissingId,

    #[error("household '{0}' is recorded more than once")]
    DuplicateCase(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<serde_json::Error> for RecordingError {
    fn from(err: serde_json::Error) -> Self {
        RecordingError::Json(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCase {
    pub household: Household,
    pub fields: ReferenceRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub year: i32,
    pub cases: Vec<RecordedCase>,
}

impl Recording {
    /// Evaluates every household with `engine` and records the results.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error.
    pub fn record<'a>(
        engine: &Orchestrator,
        households: impl IntoIterator<Item = &'a Household>,
        year: i32,
    ) -> Result<Self, RecordingError> {
        let cases = households
            .into_iter()
            .map(|household| {
                engine.evaluate(household, year).map(|result| RecordedCase {
                    household: household.clone(),
                    fields: result.fields(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { year, cases })
    }

    pub fn households(&self) -> Vec<Household> {
        self.cases.iter().map(|case| case.household.clone()).collect()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RecordingError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer<W: Write>(
        &self,
        writer: W,
    ) -> Result<(), RecordingError> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let file = File::open(path).map_err(|err| io_error(path, err))?;
        let recording = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), year = recording.year, cases = recording.cases.len(), "loaded recording");
        Ok(recording)
    }

    pub fn save(
        &self,
        path: &Path,
    ) -> Result<(), RecordingError> {
        let file = File::create(path).map_err(|err| io_error(path, err))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|err| io_error(path, err))?;
        info!(path = %path.display(), year = self.year, cases = self.cases.len(), "saved recording");
        Ok(())
    }
}

fn io_error(
    path: &Path,
    err: std::io::Error,
) -> RecordingError {
    RecordingError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Serves the fields of a [`Recording`] by household id.
///
/// A household is only served when it equals the recorded one; a stale
/// recording fails instead of yielding another household's amounts.
#[derive(Debug, Clone)]
pub struct RecordedOracle {
    year: i32,
    cases: HashMap<String, RecordedCase>,
}

impl RecordedOracle {
    /// # Errors
    ///
    /// Returns [`RecordingError::MissingId`] or [`RecordingError::DuplicateCase`]
    /// when cases cannot be told apart.
    pub fn new(recording: Recording) -> Result<Self, RecordingError> {
        let mut cases = HashMap::with_capacity(recording.cases.len());
        for case in recording.cases {
            if case.household.id.is_empty() {
                return Err(RecordingError::MissingId);
            }
            if cases.contains_key(&case.household.id) {
                return Err(RecordingError::DuplicateCase(case.household.id));
            }
            cases.insert(case.household.id.clone(), case);
        }
        Ok(Self {
            year: recording.year,
            cases,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl ReferenceOracle for RecordedOracle {
    fn reference(
        &self,
        household: &Household,
        year: i32,
    ) -> Result<ReferenceRecord, OracleError> {
        if year != self.year {
            return Err(OracleError::new(format!(
                "recording covers {}, not {year}",
                self.year
            )));
        }
        let case = self
            .cases
            .get(&household.id)
            .ok_or_else(|| OracleError::new("household not in recording"))?;
        if case.household != *household {
            return Err(OracleError::new("household differs from recording"));
        }
        Ok(case.fields.clone())
    }
}
