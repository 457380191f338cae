use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use revdisp_core::{EngineError, Jurisdiction, MemorySource, ParameterRecord, ParameterSource, ProgramId};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading parameter tables.
#[derive(Debug, Error)]
pub enum TableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("line {line}: unknown jurisdiction '{value}'")]
    UnknownJurisdiction { line: u64, value: String },

    #[error("line {line}: unknown program '{value}'")]
    UnknownProgram { line: u64, value: String },

    #[error("line {line}: program {program} is configured by {expected}, not {found}")]
    JurisdictionMismatch {
        line: u64,
        program: ProgramId,
        expected: Jurisdiction,
        found: Jurisdiction,
    },

    #[error("cannot read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("no parameter tables (*.csv) found in {}", .0.display())]
    NoTables(PathBuf),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<csv::Error> for TableLoaderError {
    fn from(err: csv::Error) -> Self {
        TableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a parameter table CSV file.
///
/// - `tax_year`: the calendar year (e.g., 2024)
/// - `jurisdiction`: `QC` or `CA`
/// - `program`: program code (e.g., `quebec_income_tax`)
/// - `parameter`: parameter name within the program
/// - `value`: the scalar value, or the band rate for schedule rows
/// - `min_income`: lower bound of a schedule band (empty for scalars)
/// - `max_income`: upper bound of a schedule band (empty for scalars and the top band)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ParameterRow {
    pub tax_year: i32,
    pub jurisdiction: String,
    pub program: String,
    pub parameter: String,
    pub value: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub min_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl ParameterRow {
    fn into_record(
        self,
        line: u64,
    ) -> Result<ParameterRecord, TableLoaderError> {
        let jurisdiction = Jurisdiction::parse(&self.jurisdiction).ok_or_else(|| {
            TableLoaderError::UnknownJurisdiction {
                line,
                value: self.jurisdiction.clone(),
            }
        })?;
        let program = ProgramId::parse(&self.program).ok_or_else(|| TableLoaderError::UnknownProgram {
            line,
            value: self.program.clone(),
        })?;
        if program.jurisdiction() != jurisdiction {
            return Err(TableLoaderError::JurisdictionMismatch {
                line,
                program,
                expected: program.jurisdiction(),
                found: jurisdiction,
            });
        }

        Ok(ParameterRecord {
            tax_year: self.tax_year,
            jurisdiction,
            program,
            parameter: self.parameter,
            value: self.value,
            min_income: self.min_income,
            max_income: self.max_income,
        })
    }
}

/// Loader for versioned parameter tables stored as CSV.
///
/// Lines starting with `#` are comments. A file may hold any number of
/// (year, jurisdiction) tables, but each table must live in exactly one file:
/// tables are append-only, so a directory that defines the same table twice
/// is rejected.
pub struct ParameterTableLoader;

impl ParameterTableLoader {
    /// Parse parameter records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ParameterRecord>, TableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut row = csv::StringRecord::new();
        let mut records = Vec::new();

        while csv_reader.read_record(&mut row)? {
            let line = row.position().map_or(0, |position| position.line());
            let parsed: ParameterRow = row.deserialize(Some(&headers))?;
            records.push(parsed.into_record(line)?);
        }

        Ok(records)
    }

    /// Parse `reader` and register its tables in a new source.
    pub fn source<R: Read>(reader: R) -> Result<MemorySource, TableLoaderError> {
        Ok(MemorySource::from_records(Self::parse(reader)?)?)
    }

    /// Load a single CSV file.
    pub fn load_file(path: &Path) -> Result<MemorySource, TableLoaderError> {
        let file = File::open(path).map_err(|err| TableLoaderError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let source = Self::source(file)?;
        debug!(path = %path.display(), years = ?source.years(), "loaded parameter file");
        Ok(source)
    }

    /// Load every `*.csv` file of `dir`, in file-name order.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable or malformed file, when two files define
    /// the same table, or when the directory holds no table at all.
    pub fn load_dir(dir: &Path) -> Result<MemorySource, TableLoaderError> {
        let io = |err: std::io::Error| TableLoaderError::Io {
            path: dir.to_path_buf(),
            message: err.to_string(),
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io)?;
        paths.retain(|path| path.extension().is_some_and(|ext| ext == "csv"));
        paths.sort();

        if paths.is_empty() {
            return Err(TableLoaderError::NoTables(dir.to_path_buf()));
        }

        let mut source = MemorySource::new();
        for path in &paths {
            source.extend(Self::load_file(path)?)?;
        }
        info!(dir = %dir.display(), files = paths.len(), "loaded parameter tables");
        Ok(source)
    }
}
